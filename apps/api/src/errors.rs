use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::assist::AssistError;
use crate::report::RenderError;
use crate::store::transfer::FormatError;
use crate::store::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Assist(#[from] AssistError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Format(e) => (StatusCode::BAD_REQUEST, "INVALID_IMPORT", e.to_string()),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "The evaluations file could not be read or written".to_string(),
                )
            }
            AppError::Assist(AssistError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Assist(e @ AssistError::NotConfigured(_)) => {
                tracing::warn!("{e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "ASSIST_NOT_CONFIGURED",
                    e.to_string(),
                )
            }
            AppError::Assist(e) => {
                tracing::error!("Assist error: {e}");
                (StatusCode::BAD_GATEWAY, "ASSIST_ERROR", e.to_string())
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "The report could not be rendered".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
