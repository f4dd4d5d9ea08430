//! Configuration management for the Rain Tomorrow Prediction service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with RTP_ prefix

use std::path::{Path, PathBuf};

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Persisted artifact locations
    pub artifacts: ArtifactsConfig,

    /// Offline training parameters
    pub training: TrainingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

/// File-layout contract for persisted artifacts: the raw CSV consumed by
/// the processor, the processed split directory, and the model directory.
#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactsConfig {
    /// Raw historical CSV consumed by the dataset processor
    pub raw_data_path: String,

    /// Directory holding the four persisted train/test artifacts
    pub processed_dir: String,

    /// Directory holding the fitted model and its vocabulary manifest
    pub model_dir: String,
}

impl ArtifactsConfig {
    pub fn model_path(&self) -> PathBuf {
        Path::new(&self.model_dir).join("model.gbdt")
    }

    /// Training-time vocabulary manifest persisted beside the model.
    pub fn model_vocab_path(&self) -> PathBuf {
        Path::new(&self.model_dir).join("vocab.json")
    }

    /// Vocabulary manifest as written by the dataset processor.
    pub fn processed_vocab_path(&self) -> PathBuf {
        Path::new(&self.processed_dir).join("vocab.json")
    }

    pub fn x_train_path(&self) -> PathBuf {
        Path::new(&self.processed_dir).join("x_train.json")
    }

    pub fn x_test_path(&self) -> PathBuf {
        Path::new(&self.processed_dir).join("x_test.json")
    }

    pub fn y_train_path(&self) -> PathBuf {
        Path::new(&self.processed_dir).join("y_train.json")
    }

    pub fn y_test_path(&self) -> PathBuf {
        Path::new(&self.processed_dir).join("y_test.json")
    }
}

/// Hyperparameters and split settings for the offline pipeline.
///
/// These are passed through to the boosting library opaquely; the pipeline
/// contains no training logic of its own.
#[derive(Debug, Deserialize, Clone)]
pub struct TrainingConfig {
    /// Fixed seed for the reproducible train/test split
    pub seed: u64,

    /// Fraction of rows held out for evaluation
    pub test_fraction: f64,

    /// Number of boosting iterations
    pub iterations: usize,

    /// Maximum tree depth
    pub max_depth: u32,

    /// Learning rate
    pub shrinkage: f32,

    /// Minimum samples per leaf
    pub min_leaf_size: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("RTP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("artifacts.raw_data_path", "artifacts/raw/data.csv")?
            .set_default("artifacts.processed_dir", "artifacts/processed")?
            .set_default("artifacts.model_dir", "artifacts/models")?
            .set_default("training.seed", 42)?
            .set_default("training.test_fraction", 0.2)?
            .set_default("training.iterations", 100)?
            .set_default("training.max_depth", 6)?
            .set_default("training.shrinkage", 0.1)?
            .set_default("training.min_leaf_size", 1)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (RTP_ prefix)
            .add_source(
                Environment::with_prefix("RTP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_fraction: 0.2,
            iterations: 100,
            max_depth: 6,
            shrinkage: 0.1,
            min_leaf_size: 1,
        }
    }
}
