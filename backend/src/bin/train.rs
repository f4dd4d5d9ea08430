//! Rain Tomorrow Prediction - Training Pipeline
//!
//! Runs the offline pipeline end to end: preprocess the raw historical
//! CSV into train/test artifacts, then fit and evaluate the classifier.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rain_prediction_backend::services::{DatasetProcessor, ModelTrainer};
use rain_prediction_backend::Config;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rtp_train=debug,rain_prediction_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting the weather prediction training pipeline");
    tracing::info!("Environment: {}", config.environment);

    let mut processor = DatasetProcessor::new(&config.artifacts, &config.training)?;
    processor.run()?;

    let trainer = ModelTrainer::new(&config.artifacts, &config.training)?;
    let report = trainer.run()?;

    tracing::info!(
        "Pipeline completed: test accuracy {:.4}, f1 {:.4}",
        report.accuracy,
        report.f1
    );
    Ok(())
}
