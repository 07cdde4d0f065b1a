use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::instrument;

use crate::{errors::AppError, routes::ApiPath, services::auth::Claims, startup::AppState};

pub async fn list_recipes(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.feed_service.all_public_recipes().await?))
}

/// Single recipe. Owners also see their private recipes when authenticated.
#[instrument(name = "HTTP: Get recipe", skip(state, claims))]
pub async fn get_recipe(
    State(state): State<AppState>,
    claims: Option<Claims>,
    WithRejection(Path(recipe_id), _): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let viewer_id = claims.map(|c| c.user_id()).transpose()?;
    let recipe = state.recipe_service.get_recipe(recipe_id, viewer_id).await?;
    Ok(Json(recipe))
}

#[instrument(name = "HTTP: Public recipes of user", skip(state))]
pub async fn user_recipes(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let recipes = state
        .recipe_service
        .list_public_recipes_for_user(user_id)
        .await?;
    Ok(Json(recipes))
}
