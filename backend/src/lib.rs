//! Rain Tomorrow Prediction - Backend
//!
//! Serves a trained gradient-boosted classifier behind a minimal JSON API,
//! and hosts the offline pipeline that produces the classifier artifact.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use services::model::RainModel;

/// Application state shared across handlers
///
/// Built once at startup; the model and config are read-only thereafter,
/// so concurrent requests only ever share immutable state.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<RainModel>,
    pub config: Arc<Config>,
}
