//! Offline training: fit the classifier, evaluate, persist the artifact
//!
//! Pure library-call sequencing around the boosting crate; evaluation is
//! observational only, so training succeeds whenever fitting succeeds.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use gbdt::config::Config as GbdtConfig;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{ArtifactsConfig, TrainingConfig};
use crate::error::{AppError, AppResult};
use crate::services::dataset::{LabelColumn, SplitMatrix};
use crate::services::metrics;

/// The five numbers logged after every training run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub training_score: f64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

struct LoadedSplits {
    x_train: SplitMatrix,
    x_test: SplitMatrix,
    y_train: LabelColumn,
    y_test: LabelColumn,
}

/// Fits a classifier on the persisted train split, evaluates on the test
/// split, and persists the fitted artifact and its vocabulary manifest.
pub struct ModelTrainer {
    artifacts: ArtifactsConfig,
    params: TrainingConfig,
}

impl ModelTrainer {
    /// Create a new ModelTrainer instance
    pub fn new(artifacts: &ArtifactsConfig, params: &TrainingConfig) -> AppResult<Self> {
        fs::create_dir_all(&artifacts.model_dir).map_err(|e| AppError::data("init", e))?;

        tracing::info!("Model trainer initialised");
        Ok(Self {
            artifacts: artifacts.clone(),
            params: params.clone(),
        })
    }

    /// Execute the complete workflow: load splits, fit, persist, evaluate.
    pub fn run(&self) -> AppResult<TrainingReport> {
        let splits = self.load_data()?;
        let model = self.train(&splits)?;
        let report = self.evaluate(&model, &splits);
        tracing::info!("Model training and evaluation completed successfully");
        Ok(report)
    }

    fn load_data(&self) -> AppResult<LoadedSplits> {
        let splits = LoadedSplits {
            x_train: load_json(&self.artifacts.x_train_path())?,
            x_test: load_json(&self.artifacts.x_test_path())?,
            y_train: load_json(&self.artifacts.y_train_path())?,
            y_test: load_json(&self.artifacts.y_test_path())?,
        };
        tracing::info!(
            "Preprocessed data loaded successfully. {} train / {} test rows",
            splits.x_train.rows.len(),
            splits.x_test.rows.len()
        );
        Ok(splits)
    }

    fn train(&self, splits: &LoadedSplits) -> AppResult<GBDT> {
        let mut cfg = GbdtConfig::new();
        cfg.set_feature_size(splits.x_train.columns.len());
        cfg.set_max_depth(self.params.max_depth);
        cfg.set_iterations(self.params.iterations);
        cfg.set_shrinkage(self.params.shrinkage);
        cfg.set_min_leaf_size(self.params.min_leaf_size);
        // Binomial log-likelihood: binary classification, labels in {-1, 1},
        // predictions are positive-class probabilities.
        cfg.set_loss("LogLikelyhood");
        cfg.set_data_sample_ratio(1.0);
        cfg.set_feature_sample_ratio(1.0);
        cfg.set_training_optimization_level(2);

        let mut training: DataVec = splits
            .x_train
            .rows
            .iter()
            .zip(&splits.y_train.values)
            .map(|(row, &label)| {
                let features: Vec<f32> = row.iter().map(|v| *v as f32).collect();
                let signed = if label > 0.5 { 1.0 } else { -1.0 };
                Data::new_training_data(features, 1.0, signed, None)
            })
            .collect();

        let mut gbdt = GBDT::new(&cfg);
        gbdt.fit(&mut training);

        let model_path = self.artifacts.model_path();
        let path_str = model_path.to_str().ok_or_else(|| {
            AppError::data("train", format!("invalid path {}", model_path.display()))
        })?;
        gbdt.save_model(path_str)
            .map_err(|e| AppError::data("train", format!("{}: {}", model_path.display(), e)))?;

        // Keep the training-time vocabulary beside the model so the server
        // can cross-check it at load time.
        let processed_vocab = self.artifacts.processed_vocab_path();
        if processed_vocab.exists() {
            fs::copy(&processed_vocab, self.artifacts.model_vocab_path())
                .map_err(|e| AppError::data("train", e))?;
        } else {
            tracing::warn!(
                "No vocabulary manifest at {}; model persisted without one",
                processed_vocab.display()
            );
        }

        tracing::info!(
            "Model trained and saved successfully at {}",
            model_path.display()
        );
        Ok(gbdt)
    }

    fn evaluate(&self, model: &GBDT, splits: &LoadedSplits) -> TrainingReport {
        let train_actual = to_labels(&splits.y_train.values);
        let train_predicted = predict_labels(model, &splits.x_train);
        let training_score = metrics::accuracy(&train_actual, &train_predicted);
        tracing::info!("Training model score: {:.4}", training_score);

        let test_actual = to_labels(&splits.y_test.values);
        let test_predicted = predict_labels(model, &splits.x_test);
        let report = TrainingReport {
            training_score,
            accuracy: metrics::accuracy(&test_actual, &test_predicted),
            precision: metrics::weighted_precision(&test_actual, &test_predicted),
            recall: metrics::weighted_recall(&test_actual, &test_predicted),
            f1: metrics::weighted_f1(&test_actual, &test_predicted),
        };

        tracing::info!(
            "Evaluation results: accuracy={:.4} precision={:.4} recall={:.4} f1={:.4}",
            report.accuracy,
            report.precision,
            report.recall,
            report.f1
        );
        report
    }
}

fn predict_labels(model: &GBDT, matrix: &SplitMatrix) -> Vec<i64> {
    let samples: DataVec = matrix
        .rows
        .iter()
        .map(|row| {
            let features: Vec<f32> = row.iter().map(|v| *v as f32).collect();
            Data::new_test_data(features, None)
        })
        .collect();
    model
        .predict(&samples)
        .iter()
        .map(|p| if *p > 0.5 { 1 } else { 0 })
        .collect()
}

fn to_labels(values: &[f64]) -> Vec<i64> {
    values.iter().map(|v| if *v > 0.5 { 1 } else { 0 }).collect()
}

fn load_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let file = File::open(path)
        .map_err(|e| AppError::data("load-artifacts", format!("{}: {}", path.display(), e)))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::data("load-artifacts", format!("{}: {}", path.display(), e)))
}
