//! Shared types and tables for the Rain Tomorrow Prediction service
//!
//! This crate contains everything both flows depend on: the categorical
//! vocabularies, the feature schema and derivation heuristics, and the
//! input validation rules. It is pure computation with no I/O, so the
//! online server and the offline pipeline stay byte-for-byte consistent.

pub mod models;
pub mod types;
pub mod validation;
pub mod vocab;

pub use models::*;
pub use types::*;
pub use validation::*;
pub use vocab::*;
