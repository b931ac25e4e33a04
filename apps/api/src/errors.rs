use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::github::FetchError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Generation failures are absent on purpose: the description generator absorbs them
/// and falls back to the template, so they never reach this boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("GitHub API error: {0}")]
    NotFound(String),

    #[error("Error fetching GitHub data: {0}")]
    Upstream(String),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::MissingUsername => AppError::Validation(err.to_string()),
            FetchError::NotFound(_) => AppError::NotFound(err.to_string()),
            FetchError::Status { .. }
            | FetchError::Http(_)
            | FetchError::Decode(_)
            | FetchError::InvalidUrl(_) => AppError::Upstream(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(msg) => {
                tracing::info!("Upstream resource not found: {msg}");
                StatusCode::NOT_FOUND
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}
