//! Health check handlers

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
}

/// Health check endpoint handler
///
/// The process refuses to start without a loaded model, so a responding
/// server implies the model is available.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: "loaded".to_string(),
    })
}
