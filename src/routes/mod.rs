use axum::{
    Json,
    extract::{Path, Query},
};
use axum_extra::extract::WithRejection;

use crate::errors::AppError;

pub mod auth;
pub mod feed;
pub mod health;
pub mod public;
pub mod recipes;
pub mod upload;
pub mod users;

// Extractors whose rejections render as our JSON error body.
pub type ApiJson<T> = WithRejection<Json<T>, AppError>;
pub type ApiPath<T> = WithRejection<Path<T>, AppError>;
pub type ApiQuery<T> = WithRejection<Query<T>, AppError>;
