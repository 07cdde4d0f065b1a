use crate::helpers::{json_body, spawn_app};

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;
    let response = app.get("/health").send().await.expect("request");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn register_then_login_then_wrong_password() {
    let app = spawn_app().await;

    let response = app.post_register("ana", "ana@x.com", "pw123456").await;
    assert_eq!(response.status().as_u16(), 201);
    let registered = json_body(response).await;
    let user_id = registered["userId"].as_i64().expect("userId");

    let response = app.post_login("ana", "pw123456").await;
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers().get("set-cookie").is_some());
    let body = json_body(response).await;
    assert_eq!(body["user"]["id"].as_i64(), Some(user_id));
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["user"].get("password_hash").is_none());

    let response = app.post_login("ana", "wrong").await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(json_body(response).await["kind"], "auth_error");
}

#[tokio::test]
async fn duplicate_registration_is_a_400() {
    let app = spawn_app().await;
    app.post_register("ana", "ana@x.com", "pw123456").await;

    let response = app.post_register("ana", "other@x.com", "pw123456").await;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(json_body(response).await["kind"], "conflict");
}

#[tokio::test]
async fn register_returns_400_for_missing_fields() {
    let app = spawn_app().await;
    let cases = [
        serde_json::json!({ "email": "a@x.com", "password": "pw" }),
        serde_json::json!({ "username": "ana", "password": "pw" }),
        serde_json::json!({ "username": "ana", "email": "a@x.com" }),
    ];

    for case in cases {
        let response = app
            .post("/auth/register")
            .json(&case)
            .send()
            .await
            .expect("request");
        assert_eq!(response.status().as_u16(), 400, "payload {case}");
        assert_eq!(json_body(response).await["kind"], "validation_error");
    }
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = spawn_app().await;
    let response = app
        .post("/auth/login")
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(json_body(response).await["kind"], "validation_error");
}

#[tokio::test]
async fn mutations_require_a_valid_token() {
    let app = spawn_app().await;

    let response = app
        .post("/recipes")
        .json(&crate::helpers::soup(true))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 401);

    let response = app
        .post("/recipes")
        .bearer_auth("not-a-jwt")
        .json(&crate::helpers::soup(true))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 401);
}

/// The `name=value` pair of the token cookie set by a login response.
fn session_cookie(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("set-cookie")
        .to_string()
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let app = spawn_app().await;
    app.post_register("ana", "ana@x.com", "pw123456").await;
    let login = app.post_login("ana", "pw123456").await;
    let cookie = session_cookie(&login);
    assert!(cookie.starts_with("jwt="));

    let response = app
        .post("/auth/logout")
        .header("cookie", &cookie)
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 204);
    let cleared = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie");
    assert!(cleared.starts_with("jwt=;"));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn session_cookie_authenticates_without_a_header() {
    let app = spawn_app().await;
    app.post_register("ana", "ana@x.com", "pw123456").await;
    let cookie = session_cookie(&app.post_login("ana", "pw123456").await);

    let response = app
        .post("/recipes")
        .header("cookie", &cookie)
        .json(&crate::helpers::soup(true))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 201);
}

#[tokio::test]
async fn bearer_header_wins_over_a_stale_cookie() {
    let app = spawn_app().await;
    let ana = app.signed_up("ana").await;

    let response = app
        .post("/recipes")
        .header("cookie", "jwt=expired-or-garbage")
        .bearer_auth(&ana.token)
        .json(&crate::helpers::soup(true))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 201);
}
