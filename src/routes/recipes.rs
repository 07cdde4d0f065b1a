use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::{
    errors::AppError,
    models::recipe::RecipeFields,
    routes::{ApiJson, ApiPath},
    services::auth::Claims,
    startup::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    /// Optional, for clients that still send it. Must match the caller.
    user_id: Option<i64>,
    #[serde(flatten)]
    fields: RecipeFields,
}

/// The owner's dashboard listing. Only the owner may read it.
#[instrument(name = "HTTP: List own recipes", skip(state, claims), fields(user = %claims))]
pub async fn list_for_owner(
    State(state): State<AppState>,
    claims: Claims,
    WithRejection(Path(owner_id), _): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    if claims.user_id()? != owner_id {
        return Err(AppError::Forbidden);
    }
    let recipes = state.recipe_service.list_recipes_for_owner(owner_id).await?;
    Ok(Json(recipes))
}

#[instrument(name = "HTTP: Create recipe", skip(state, claims, request), fields(user = %claims))]
pub async fn create(
    State(state): State<AppState>,
    claims: Claims,
    WithRejection(Json(request), _): ApiJson<CreateRecipeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let caller_id = claims.user_id()?;
    if request.user_id.is_some_and(|id| id != caller_id) {
        return Err(AppError::Forbidden);
    }
    let recipe_id = state
        .recipe_service
        .create_recipe(caller_id, &request.fields)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Recipe created", "recipeId": recipe_id })),
    ))
}

#[instrument(name = "HTTP: Update recipe", skip(state, claims, payload), fields(user = %claims))]
pub async fn update(
    State(state): State<AppState>,
    claims: Claims,
    WithRejection(Path(recipe_id), _): ApiPath<i64>,
    WithRejection(Json(payload), _): ApiJson<RecipeFields>,
) -> Result<impl IntoResponse, AppError> {
    state
        .recipe_service
        .update_recipe(recipe_id, claims.user_id()?, &payload)
        .await?;
    Ok(Json(json!({ "message": "Recipe updated" })))
}

#[instrument(name = "HTTP: Delete recipe", skip(state, claims), fields(user = %claims))]
pub async fn delete(
    State(state): State<AppState>,
    claims: Claims,
    WithRejection(Path(recipe_id), _): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .recipe_service
        .delete_recipe(recipe_id, claims.user_id()?)
        .await?;
    Ok(Json(json!({ "message": "Recipe deleted" })))
}
