//! HTTP request handlers

pub mod health;
pub mod incidents;
pub mod metrics;
pub mod simulate;

use axum::http::Uri;

use crate::error::ApiError;

/// Fallback for paths outside the route table
pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
