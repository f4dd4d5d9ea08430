//! API route definitions

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// Build the versioned API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/predict", predict_routes())
}

fn predict_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::predict))
        .route("/options", get(handlers::predict_options))
}
