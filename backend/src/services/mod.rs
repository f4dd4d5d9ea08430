//! Business logic services for the Rain Tomorrow Prediction service

pub mod dataset;
pub mod inference;
pub mod metrics;
pub mod model;
pub mod training;

pub use dataset::DatasetProcessor;
pub use inference::InferenceService;
pub use model::RainModel;
pub use training::ModelTrainer;
