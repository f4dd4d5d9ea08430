//! Error handling for the Rain Tomorrow Prediction service
//!
//! Three categories, per unit of work: validation failures are surfaced to
//! the caller and never fatal; data errors abort the current pipeline run
//! with stage context; model-load errors are fatal at startup.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Online flow: rejected user input
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    // Offline flow: a pipeline stage failed; no partial retry
    #[error("{stage} stage failed: {message}")]
    Data { stage: &'static str, message: String },

    // Model artifact could not be loaded; the server must not start
    #[error("Model load error: {0}")]
    ModelLoad(String),

    // Training-time vocabulary does not match the serving tables
    #[error("Vocabulary mismatch: {0}")]
    VocabularyMismatch(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn data(stage: &'static str, cause: impl std::fmt::Display) -> Self {
        AppError::Data {
            stage,
            message: cause.to_string(),
        }
    }
}

impl From<shared::validation::InvalidField> for AppError {
    fn from(err: shared::validation::InvalidField) -> Self {
        AppError::Validation {
            field: err.field.to_string(),
            message: err.message,
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::Data { stage, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATA_ERROR".to_string(),
                    message: format!("{} stage failed: {}", stage, message),
                    field: None,
                },
            ),
            AppError::ModelLoad(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "MODEL_UNAVAILABLE".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::VocabularyMismatch(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "VOCABULARY_MISMATCH".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::Configuration(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: err.to_string(),
                    field: None,
                },
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
