use std::sync::LazyLock;

use recipebox::configuration::{
    ApplicationSettings, DatabaseSettings, Settings, TelemetrySettings,
};
use recipebox::startup::Application;
use recipebox::telementry::{get_subscriber, init_subscriber};
use reqwest::{RequestBuilder, Response};
use secrecy::SecretString;
use serde_json::{Value, json};

// Logs are discarded unless TEST_LOG is set.
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber =
            get_subscriber(subscriber_name, default_filter_level, None, std::io::stdout)
                .expect("build subscriber");
        init_subscriber(subscriber).expect("init subscriber");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, None, std::io::sink)
            .expect("build subscriber");
        init_subscriber(subscriber).expect("init subscriber");
    }
});

pub const MAX_UPLOAD_BYTES: usize = 64 * 1024;

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub uploads_dir: std::path::PathBuf,
    _dir: tempfile::TempDir,
}

pub struct TestUser {
    pub id: i64,
    pub token: String,
}

pub async fn spawn_app() -> TestApp {
    LazyLock::force(&TRACING);

    let dir = tempfile::tempdir().expect("tempdir");
    let uploads_dir = dir.path().join("uploads");
    let settings = Settings {
        database: DatabaseSettings {
            filename: dir.path().join("test.db"),
            create_if_missing: true,
        },
        application: ApplicationSettings {
            host: "127.0.0.1".into(),
            port: 0,
            jwt_secret: SecretString::from("integration-test-secret".to_string()),
            token_ttl_hours: 1,
            uploads_dir: uploads_dir.clone(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
        },
        telemetry: TelemetrySettings::default(),
    };

    let application = Application::build(settings)
        .await
        .expect("Failed to build application");
    let address = format!("http://127.0.0.1:{}", application.port());
    tokio::spawn(application.run_until_stopped());

    TestApp {
        address,
        api_client: reqwest::Client::new(),
        uploads_dir,
        _dir: dir,
    }
}

impl TestApp {
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    pub async fn post_register(&self, username: &str, email: &str, password: &str) -> Response {
        self.post("/auth/register")
            .json(&json!({ "username": username, "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_login(&self, username: &str, password: &str) -> Response {
        self.post("/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Registers `username` with a derived email and logs in.
    pub async fn signed_up(&self, username: &str) -> TestUser {
        let email = format!("{username}@x.com");
        let response = self.post_register(username, &email, "pw123456").await;
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = self
            .post_login(username, "pw123456")
            .await
            .json()
            .await
            .expect("login body");
        TestUser {
            id: body["user"]["id"].as_i64().expect("user id"),
            token: body["access_token"].as_str().expect("token").to_string(),
        }
    }

    pub async fn create_recipe(&self, user: &TestUser, recipe: &Value) -> Response {
        self.post("/recipes")
            .bearer_auth(&user.token)
            .json(recipe)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Creates a recipe and returns its id.
    pub async fn created_recipe(&self, user: &TestUser, recipe: &Value) -> i64 {
        let response = self.create_recipe(user, recipe).await;
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.expect("create body");
        body["recipeId"].as_i64().expect("recipe id")
    }
}

pub fn soup(is_public: bool) -> Value {
    json!({
        "title": "Soup",
        "ingredients": "water,salt",
        "instructions": "boil",
        "is_public": is_public,
    })
}

pub async fn json_body(response: Response) -> Value {
    response.json().await.expect("json body")
}
