//! Rain Tomorrow Prediction - Backend Server
//!
//! Loads the trained classifier and serves rain predictions for
//! Australian locations over a small JSON API.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rain_prediction_backend::services::model::RainModel;
use rain_prediction_backend::{handlers, routes, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rtp_server=debug,rain_prediction_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Rain Tomorrow Prediction Server");
    tracing::info!("Environment: {}", config.environment);

    // A server without a model cannot answer anything useful, so a load
    // failure is fatal at startup rather than a per-request 503.
    tracing::info!("Loading model from {}", config.artifacts.model_path().display());
    let model = RainModel::load(&config.artifacts)?;
    tracing::info!("Model loaded successfully");

    // Create application state
    let state = AppState {
        model: Arc::new(model),
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Rain Tomorrow Prediction API v1.0"
}
