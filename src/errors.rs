use axum::{
    Json,
    extract::multipart::MultipartRejection,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Every failure a service operation can surface to the HTTP boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("A user with this username or email already exists")]
    UserAlreadyExists,

    #[error("{0}")]
    Conflict(String),

    #[error("Users cannot follow themselves")]
    SelfFollow,

    #[error("Wrong credentials")]
    WrongCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token creation error")]
    TokenCreation,

    #[error("You are not allowed to modify this resource")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Storage error")]
    Storage(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::PayloadTooLarge => "validation_error",
            AppError::UserAlreadyExists | AppError::Conflict(_) => "conflict",
            AppError::SelfFollow => "self_follow",
            AppError::WrongCredentials | AppError::InvalidToken => "auth_error",
            AppError::Forbidden => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::Storage(_) => "storage_error",
            AppError::TokenCreation | AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::UserAlreadyExists | AppError::SelfFollow => {
                StatusCode::BAD_REQUEST
            }
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::WrongCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Storage(_) | AppError::TokenCreation | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Storage(e) => tracing::error!("Storage failure: {:?}", e),
            AppError::Internal(e) => tracing::error!("Internal failure: {:?}", e),
            _ => {}
        }

        // The Display text of storage and internal variants is generic, so
        // engine messages never reach the client.
        let body = Json(json!({
            "kind": self.kind(),
            "error": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge;
        }
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Maps a unique-constraint violation to `on_unique`, leaving every other
/// database error as a storage failure.
pub fn map_unique_violation(e: sqlx::Error, on_unique: AppError) -> AppError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => on_unique,
        _ => AppError::Storage(e),
    }
}
