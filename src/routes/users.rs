use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::{
    errors::AppError,
    routes::{ApiJson, ApiPath, ApiQuery},
    services::auth::Claims,
    startup::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    query: String,
}

#[derive(Debug, Deserialize)]
pub struct BioPayload {
    #[serde(default)]
    bio: String,
}

#[derive(Debug, Deserialize)]
pub struct AvatarPayload {
    #[serde(default, alias = "avatarUrl")]
    avatar_url: String,
}

#[instrument(name = "HTTP: Search users", skip(state))]
pub async fn search(
    State(state): State<AppState>,
    WithRejection(Query(params), _): ApiQuery<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.feed_service.search_users(&params.query).await?;
    Ok(Json(users))
}

#[instrument(name = "HTTP: Get profile", skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.profile_service.get_profile(user_id).await?))
}

#[instrument(name = "HTTP: Update bio", skip(state, claims, payload), fields(user = %claims))]
pub async fn update_profile(
    State(state): State<AppState>,
    claims: Claims,
    WithRejection(Path(user_id), _): ApiPath<i64>,
    WithRejection(Json(payload), _): ApiJson<BioPayload>,
) -> Result<impl IntoResponse, AppError> {
    state
        .profile_service
        .update_bio(user_id, claims.user_id()?, &payload.bio)
        .await?;
    Ok(Json(json!({ "message": "Profile updated" })))
}

#[instrument(name = "HTTP: Update avatar", skip(state, claims, payload), fields(user = %claims))]
pub async fn update_avatar(
    State(state): State<AppState>,
    claims: Claims,
    WithRejection(Path(user_id), _): ApiPath<i64>,
    WithRejection(Json(payload), _): ApiJson<AvatarPayload>,
) -> Result<impl IntoResponse, AppError> {
    state
        .profile_service
        .update_avatar(user_id, claims.user_id()?, &payload.avatar_url)
        .await?;
    Ok(Json(json!({ "message": "Avatar updated" })))
}

/// The caller follows the user in the path.
#[instrument(name = "HTTP: Follow", skip(state, claims), fields(user = %claims))]
pub async fn follow(
    State(state): State<AppState>,
    claims: Claims,
    WithRejection(Path(user_id), _): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .social_service
        .follow(claims.user_id()?, user_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Now following user" })),
    ))
}

#[instrument(name = "HTTP: Unfollow", skip(state, claims), fields(user = %claims))]
pub async fn unfollow(
    State(state): State<AppState>,
    claims: Claims,
    WithRejection(Path(user_id), _): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .social_service
        .unfollow(claims.user_id()?, user_id)
        .await?;
    Ok(Json(json!({ "message": "Unfollowed user" })))
}

/// Whether `caller_id` follows `user_id`.
pub async fn follow_status(
    State(state): State<AppState>,
    WithRejection(Path((user_id, caller_id)), _): ApiPath<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let is_following = state.social_service.is_following(caller_id, user_id).await?;
    Ok(Json(json!({ "isFollowing": is_following })))
}

pub async fn followers(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.social_service.list_followers(user_id).await?))
}

pub async fn following(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.social_service.list_following(user_id).await?))
}
