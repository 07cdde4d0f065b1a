use axum::Json;
use axum::RequestPartsExt;
use axum::extract::{FromRequestParts, OptionalFromRequestParts, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::IntoResponse;
use axum_extra::extract::CookieJar;
use axum_extra::extract::TypedHeader;
use axum_extra::extract::WithRejection;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::headers::{Authorization, authorization::Bearer};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::errors::AppError;
use crate::models::user::AccountView;
use crate::routes::ApiJson;
use crate::services::auth::Claims;
use crate::startup::AppState;

const TOKEN_COOKIE: &str = "jwt";

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    user_id: i64,
    username: String,
}

#[derive(Debug, Serialize)]
pub struct AuthBody {
    access_token: String,
    token_type: String,
    user: AccountView,
}

impl AuthBody {
    fn new(access_token: String, user: AccountView) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            user,
        }
    }
}

#[instrument(name = "HTTP: Register", skip(state, payload), fields(username = %payload.username))]
pub async fn register_handler(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): ApiJson<RegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = state
        .auth_service
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    tracing::info!(user_id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id,
            username: payload.username.trim().to_string(),
        }),
    ))
}

/// Verifies credentials and issues a bearer token. The token is also set as
/// an HttpOnly cookie for browser clients.
#[instrument(
    name = "HTTP: Login",
    skip(state, jar, payload),
    fields(username = %payload.username)
)]
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): ApiJson<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    let token = state.auth_service.issue_token(user.id)?;

    let cookie = Cookie::build((TOKEN_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    tracing::info!("JWT issued for user");
    Ok((jar.add(cookie), Json(AuthBody::new(token, user.into()))))
}

#[instrument(name = "HTTP: Logout", skip(jar))]
pub async fn logout_handler(jar: CookieJar) -> impl IntoResponse {
    let updated_jar = jar.remove(Cookie::build(TOKEN_COOKIE).path("/"));
    (updated_jar, StatusCode::NO_CONTENT)
}

/// Token from the Authorization header (API) or the `jwt` cookie (browser).
/// An explicit header wins, so a stale cookie cannot shadow it.
async fn extract_token(parts: &mut Parts) -> Option<String> {
    let header_token = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .ok()
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string());
    if header_token.is_some() {
        return header_token;
    }

    parts
        .extract::<CookieJar>()
        .await
        .ok()
        .and_then(|jar| jar.get(TOKEN_COOKIE).map(|c| c.value().to_string()))
}

impl FromRequestParts<AppState> for Claims {
    type Rejection = AppError;

    #[instrument(name = "Extracting Claims", skip(parts, state))]
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_token(parts).await else {
            tracing::warn!("No JWT found in cookies or headers");
            return Err(AppError::InvalidToken);
        };
        state.auth_service.verify_token(&token)
    }
}

/// Anonymous requests yield `None`; a present but invalid token is still
/// rejected.
impl OptionalFromRequestParts<AppState> for Claims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match extract_token(parts).await {
            Some(token) => state.auth_service.verify_token(&token).map(Some),
            None => Ok(None),
        }
    }
}
