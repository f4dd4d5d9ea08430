//! Loaded classifier artifact and its vocabulary manifest
//!
//! The model is loaded once at startup and treated as an opaque oracle:
//! encoded row in, binary outlook out. Prediction borrows `&self` and the
//! ensemble holds no per-call state, so concurrent calls are safe.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use serde::{Deserialize, Serialize};

use shared::models::features::FeatureVector;
use shared::types::RainOutlook;
use shared::vocab::{LOCATIONS, WIND_DIRECTIONS};

use crate::config::ArtifactsConfig;
use crate::error::{AppError, AppResult};

/// Probability threshold for calling rain. The log-likelihood loss emits
/// the positive-class probability.
const RAIN_THRESHOLD: f32 = 0.5;

/// Label→code mappings recorded at training time, persisted beside the
/// model artifact. Code = position in the label list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VocabManifest {
    pub columns: BTreeMap<String, Vec<String>>,
}

impl VocabManifest {
    /// Record the ordered label list for one encoded column.
    pub fn record(&mut self, column: &str, labels: Vec<String>) {
        self.columns.insert(column.to_string(), labels);
    }

    /// The manifest the serving-time tables imply.
    pub fn serving() -> Self {
        let mut manifest = Self::default();
        let locations: Vec<String> = LOCATIONS.iter().map(|l| l.to_string()).collect();
        let directions: Vec<String> = WIND_DIRECTIONS.iter().map(|d| d.to_string()).collect();
        let yes_no = vec!["No".to_string(), "Yes".to_string()];

        manifest.record("Location", locations);
        manifest.record("WindGustDir", directions.clone());
        manifest.record("WindDir9am", directions.clone());
        manifest.record("WindDir3pm", directions);
        manifest.record("RainToday", yes_no.clone());
        manifest.record("RainTomorrow", yes_no);
        manifest
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| AppError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| AppError::ModelLoad(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::data("persist-vocab", e))?;
        fs::write(path, raw).map_err(|e| AppError::data("persist-vocab", e))
    }

    /// Check this manifest against another, column by column.
    ///
    /// Columns present in only one side are ignored; a column present in
    /// both must carry the identical label ordering (same bijection).
    pub fn validate_against(&self, expected: &VocabManifest) -> Result<(), String> {
        for (column, labels) in &self.columns {
            let Some(expected_labels) = expected.columns.get(column) else {
                continue;
            };
            if labels != expected_labels {
                return Err(format!(
                    "column {}: training labels {:?} differ from serving labels {:?}",
                    column, labels, expected_labels
                ));
            }
        }
        Ok(())
    }
}

/// The fitted classifier, read-only for the lifetime of the process.
pub struct RainModel {
    gbdt: GBDT,
}

impl RainModel {
    /// Wrap an already-fitted ensemble (used by the trainer and tests).
    pub fn new(gbdt: GBDT) -> Self {
        Self { gbdt }
    }

    /// Load the persisted classifier and validate its vocabulary manifest.
    ///
    /// A missing or unreadable model is fatal. A manifest that disagrees
    /// with the serving-time tables is also fatal: predictions would be
    /// silently misaligned.
    pub fn load(artifacts: &ArtifactsConfig) -> AppResult<Self> {
        let model_path = artifacts.model_path();
        let path_str = model_path
            .to_str()
            .ok_or_else(|| AppError::ModelLoad(format!("invalid path {}", model_path.display())))?;

        let gbdt = GBDT::load_model(path_str)
            .map_err(|e| AppError::ModelLoad(format!("{}: {}", model_path.display(), e)))?;

        let vocab_path = artifacts.model_vocab_path();
        if vocab_path.exists() {
            let manifest = VocabManifest::load(&vocab_path)?;
            manifest
                .validate_against(&VocabManifest::serving())
                .map_err(AppError::VocabularyMismatch)?;
            tracing::info!("Vocabulary manifest validated against serving tables");
        } else {
            tracing::warn!(
                "No vocabulary manifest at {}; skipping consistency check",
                vocab_path.display()
            );
        }

        Ok(Self { gbdt })
    }

    /// Predict rain-tomorrow for a single encoded row.
    pub fn predict(&self, row: &FeatureVector) -> RainOutlook {
        let features: Vec<f32> = row.as_slice().iter().map(|v| *v as f32).collect();
        let samples: DataVec = vec![Data::new_test_data(features, None)];
        let predictions = self.gbdt.predict(&samples);

        if predictions.first().copied().unwrap_or(0.0) > RAIN_THRESHOLD {
            RainOutlook::Rain
        } else {
            RainOutlook::NoRain
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serving_manifest_matches_itself() {
        let serving = VocabManifest::serving();
        assert!(serving.validate_against(&serving).is_ok());
    }

    #[test]
    fn test_manifest_detects_reordered_labels() {
        let mut trained = VocabManifest::serving();
        // Alphabetical wind codes, as a naive training run would record them
        let mut sorted: Vec<String> = WIND_DIRECTIONS.iter().map(|d| d.to_string()).collect();
        sorted.sort();
        trained.record("WindGustDir", sorted);

        let err = trained
            .validate_against(&VocabManifest::serving())
            .unwrap_err();
        assert!(err.contains("WindGustDir"));
    }

    #[test]
    fn test_manifest_ignores_unknown_columns() {
        let mut trained = VocabManifest::serving();
        trained.record("Cloud9am", vec!["low".into(), "high".into()]);
        assert!(trained.validate_against(&VocabManifest::serving()).is_ok());
    }
}
