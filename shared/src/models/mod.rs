//! Domain models for the Rain Tomorrow Prediction service

pub mod features;
pub mod observation;

pub use features::*;
pub use observation::*;
