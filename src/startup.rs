use crate::configuration::{DatabaseSettings, Settings};
use crate::routes::{auth, feed, health, public, recipes, upload, users};
use crate::services::auth::{AuthService, Keys};
use crate::services::feed::FeedService;
use crate::services::profile::ProfileService;
use crate::services::recipe::RecipeService;
use crate::services::social::SocialService;
use crate::services::upload::{UPLOADS_ROUTE, UploadService};
use crate::store::{FollowRepository, RecipeRepository, UserRepository, schema};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use secrecy::ExposeSecret;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth_service: AuthService,
    pub recipe_service: RecipeService,
    pub social_service: SocialService,
    pub feed_service: FeedService,
    pub profile_service: ProfileService,
    pub upload_service: UploadService,
}

impl AppState {
    pub fn new(pool: SqlitePool, settings: &Settings) -> Self {
        let app = &settings.application;
        let users = UserRepository::new(pool.clone());
        let recipes = RecipeRepository::new(pool.clone());
        let follows = FollowRepository::new(pool);

        Self {
            auth_service: AuthService::new(
                users.clone(),
                Keys::new(app.jwt_secret.expose_secret().as_bytes()),
                chrono::Duration::hours(app.token_ttl_hours),
            ),
            recipe_service: RecipeService::new(recipes.clone()),
            social_service: SocialService::new(follows, users.clone()),
            feed_service: FeedService::new(recipes, users.clone()),
            profile_service: ProfileService::new(users),
            upload_service: UploadService::new(app.uploads_dir.clone()),
        }
    }
}

pub async fn get_connection_pool(settings: &DatabaseSettings) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_with(settings.connect_options())
        .await
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let uploads = ServeDir::new(state.upload_service.dir());

    Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/recipes", post(recipes::create))
        .route(
            "/recipes/{id}",
            get(recipes::list_for_owner)
                .put(recipes::update)
                .delete(recipes::delete),
        )
        .route("/public/recipes", get(public::list_recipes))
        .route("/public/recipes/{id}", get(public::get_recipe))
        .route("/public/users/{id}/recipes", get(public::user_recipes))
        .route("/users/search", get(users::search))
        .route("/users/{id}", get(users::profile))
        .route("/users/{id}/recipes", get(public::user_recipes))
        .route("/users/{id}/profile", put(users::update_profile))
        .route("/users/{id}/avatar", put(users::update_avatar))
        .route("/users/{id}/follow", post(users::follow))
        .route("/users/{id}/unfollow", delete(users::unfollow))
        .route(
            "/users/{id}/follow-status/{caller_id}",
            get(users::follow_status),
        )
        .route("/users/{id}/followers", get(users::followers))
        .route("/users/{id}/following", get(users::following))
        .route("/feed/public", get(feed::public_feed))
        .route(
            "/upload",
            post(upload::upload_image).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .nest_service(UPLOADS_ROUTE, uploads)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Opens the database, brings its schema up to date and binds the
    /// listener. Port 0 picks a random free port.
    pub async fn build(settings: Settings) -> anyhow::Result<Self> {
        let pool = get_connection_pool(&settings.database).await?;
        schema::migrate(&pool).await?;

        let state = AppState::new(pool, &settings);
        let router = router(state, settings.application.max_upload_bytes);

        let address = format!(
            "{}:{}",
            settings.application.host, settings.application.port
        );
        let listener = TcpListener::bind(&address).await?;
        let port = listener.local_addr()?.port();
        tracing::info!(%address, port, "Listening");

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}
