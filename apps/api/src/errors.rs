use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::extraction::ExtractError;
use crate::llm_client::LlmError;
use crate::validation::ValidationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Completion service unavailable: {0}")]
    ServiceUnavailable(LlmError),

    #[error("Completion service error: {0}")]
    Service(LlmError),

    #[error("No JSON object found in model response")]
    NoJsonFound,

    #[error("{0}")]
    MalformedJson(ValidationError),

    #[error("{0}")]
    SchemaMismatch(ValidationError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        if e.is_unavailable() {
            AppError::ServiceUnavailable(e)
        } else {
            AppError::Service(e)
        }
    }
}

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::NoJsonFound => AppError::NoJsonFound,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::MalformedJson(_) => AppError::MalformedJson(e),
            ValidationError::SchemaMismatch { .. } => AppError::SchemaMismatch(e),
        }
    }
}

/// Body returned for every failed request: `{ "error": ..., "details"?: ... }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// Stable status code and user-facing message for this error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ServiceUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AI model temporarily unavailable".to_string(),
            ),
            AppError::Service(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate content".to_string(),
            ),
            AppError::NoJsonFound => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "No valid JSON found in model response".to_string(),
            ),
            AppError::MalformedJson(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to parse model response".to_string(),
            ),
            AppError::SchemaMismatch(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Model response did not match the expected format".to_string(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }

    /// Attaches the development-mode flag that controls `details`.
    pub fn with_details(self, expose_details: bool) -> ApiError {
        ApiError {
            error: self,
            expose_details,
        }
    }

    fn log(&self) {
        match self {
            AppError::Validation(msg) => tracing::debug!("Rejected request: {msg}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            other => tracing::error!("Generation failed: {other}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.with_details(false).into_response()
    }
}

/// An `AppError` paired with whether diagnostic details may be shown.
#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub expose_details: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.error.log();
        let (status, message) = self.error.status_and_message();

        let body = ErrorBody {
            error: message,
            details: self.expose_details.then(|| self.error.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
