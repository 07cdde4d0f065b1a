use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tracing::instrument;

use crate::{errors::AppError, services::auth::Claims, startup::AppState};

/// Form field names accepted for the image. `recipeImage` is what the web
/// client sends for both recipe photos and avatars.
const IMAGE_FIELDS: &[&str] = &["recipeImage", "image"];

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(e.body_text())
    }
}

#[instrument(name = "HTTP: Upload image", skip(state, claims, multipart), fields(user = %claims))]
pub async fn upload_image(
    State(state): State<AppState>,
    claims: Claims,
    WithRejection(mut multipart, _): WithRejection<Multipart, AppError>,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if !field.name().is_some_and(|name| IMAGE_FIELDS.contains(&name)) {
            continue;
        }
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let image_url = state
            .upload_service
            .store_image(file_name.as_deref(), content_type.as_deref(), &bytes)
            .await?;
        return Ok((StatusCode::CREATED, Json(json!({ "imageUrl": image_url }))));
    }

    Err(AppError::Validation("No file was uploaded".into()))
}
