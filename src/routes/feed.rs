use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use tracing::instrument;

use crate::{errors::AppError, routes::ApiQuery, startup::AppState};

#[derive(Debug, Deserialize)]
pub struct FeedParams {
    limit: Option<i64>,
    offset: Option<i64>,
}

#[instrument(name = "HTTP: Public feed", skip(state))]
pub async fn public_feed(
    State(state): State<AppState>,
    WithRejection(Query(params), _): ApiQuery<FeedParams>,
) -> Result<impl IntoResponse, AppError> {
    let recipes = state
        .feed_service
        .public_feed(params.limit, params.offset)
        .await?;
    Ok(Json(recipes))
}
