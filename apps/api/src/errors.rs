use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The target exists but is not ready for the operation (e.g. not analyzed yet).
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("LLM error: {0}")]
    Llm(String),

    /// Every item of a multi-item generation failed. The message is caller-facing.
    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable classification code exposed to callers.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Precondition(_) => "PRECONDITION_FAILED",
            AppError::Store(_) => "DATABASE_ERROR",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::Generation(_) => "GENERATION_FAILED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Malformed request bodies are input errors, reported in the usual envelope.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::JsonDataError(e) => format!("Invalid request body: {}", e.body_text()),
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON".to_string(),
            JsonRejection::MissingJsonContentType(_) => {
                "Expected a JSON body with Content-Type: application/json".to_string()
            }
            other => format!("Invalid request body: {}", other.body_text()),
        };
        AppError::Validation(message)
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Precondition(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Generation(msg) => {
                tracing::error!("Generation failed: {msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
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
