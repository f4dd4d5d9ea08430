//! Offline pipeline integration tests
//!
//! Run the dataset processor and trainer against a small CSV in a temp
//! directory and verify the persisted artifacts: imputation, gapless
//! label codes, split sizes, schema order, and the vocabulary check the
//! model loader applies.

use std::collections::BTreeSet;
use std::fs;

use tempfile::TempDir;

use rain_prediction_backend::config::{ArtifactsConfig, TrainingConfig};
use rain_prediction_backend::error::AppError;
use rain_prediction_backend::services::dataset::{DatasetProcessor, LabelColumn, SplitMatrix};
use rain_prediction_backend::services::model::{RainModel, VocabManifest};
use rain_prediction_backend::services::training::ModelTrainer;
use shared::models::features::InferredFeatures;
use shared::models::observation::RawObservation;

const RAW_CSV: &str = "\
Date,Location,MinTemp,MaxTemp,Rainfall,WindGustDir,WindDir9am,WindDir3pm,Humidity3pm,RainToday,RainTomorrow
2024-01-01,Sydney,13.0,23.0,0.0,NE,NE,NE,55,No,No
2024-01-02,Sydney,,24.0,5.0,SE,SE,SE,80,Yes,Yes
2024-01-03,Perth,15.0,30.0,0.0,SW,SW,SW,40,No,No
2024-01-04,Perth,16.0,31.0,0.0,SW,SW,SW,42,No,No
2024-01-05,Melbourne,9.0,18.0,2.0,SW,SW,SW,70,Yes,No
2024-01-06,Melbourne,8.0,17.0,0.0,W,W,W,65,No,Yes
2024-01-07,Darwin,24.0,33.0,12.0,NW,NW,NW,85,Yes,Yes
2024-01-08,Darwin,25.0,34.0,8.0,NW,NW,NW,88,Yes,Yes
2024-01-09,Hobart,5.0,14.0,0.0,W,W,W,60,No,No
2024-01-10,Hobart,6.0,15.0,1.0,W,W,W,62,No,No
";

struct Pipeline {
    _dir: TempDir,
    artifacts: ArtifactsConfig,
    training: TrainingConfig,
}

fn pipeline() -> Pipeline {
    let dir = TempDir::new().unwrap();
    let raw_path = dir.path().join("data.csv");
    fs::write(&raw_path, RAW_CSV).unwrap();

    let artifacts = ArtifactsConfig {
        raw_data_path: raw_path.to_str().unwrap().to_string(),
        processed_dir: dir.path().join("processed").to_str().unwrap().to_string(),
        model_dir: dir.path().join("models").to_str().unwrap().to_string(),
    };
    let training = TrainingConfig {
        iterations: 5,
        max_depth: 3,
        ..TrainingConfig::default()
    };
    Pipeline {
        _dir: dir,
        artifacts,
        training,
    }
}

fn load_matrix(path: &std::path::Path) -> SplitMatrix {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn load_labels(path: &std::path::Path) -> LabelColumn {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_missing_numeric_value_imputed_with_column_mean() {
    let p = pipeline();
    let mut processor = DatasetProcessor::new(&p.artifacts, &p.training).unwrap();
    processor.load_data().unwrap();
    processor.preprocess().unwrap();

    // Nine present MinTemp readings; the gap fills with their mean.
    let expected = (13.0 + 15.0 + 16.0 + 9.0 + 8.0 + 24.0 + 25.0 + 5.0 + 6.0) / 9.0;
    let min_temps = processor.numeric_column("MinTemp").unwrap();
    assert_eq!(min_temps.len(), 10);
    assert!((min_temps[1] - expected).abs() < 1e-9);
}

#[test]
fn test_date_expanded_into_year_month_day() {
    let p = pipeline();
    let mut processor = DatasetProcessor::new(&p.artifacts, &p.training).unwrap();
    processor.load_data().unwrap();
    processor.preprocess().unwrap();

    let headers = processor.headers();
    assert!(!headers.contains(&"Date".to_string()));
    assert_eq!(
        &headers[headers.len() - 3..],
        ["Year", "Month", "Day"]
    );
    assert_eq!(processor.numeric_column("Year").unwrap()[0], 2024.0);
    assert_eq!(processor.numeric_column("Month").unwrap()[0], 1.0);
    assert_eq!(processor.numeric_column("Day").unwrap()[9], 10.0);
}

#[test]
fn test_label_codes_are_gapless() {
    let p = pipeline();
    let mut processor = DatasetProcessor::new(&p.artifacts, &p.training).unwrap();
    processor.load_data().unwrap();
    processor.preprocess().unwrap();
    processor.label_encode().unwrap();

    // Five distinct locations in the file; codes must be exactly 0..=4.
    let codes: BTreeSet<i64> = processor
        .numeric_column("Location")
        .unwrap()
        .iter()
        .map(|c| *c as i64)
        .collect();
    assert_eq!(codes, (0..5).collect());

    let rain: BTreeSet<i64> = processor
        .numeric_column("RainTomorrow")
        .unwrap()
        .iter()
        .map(|c| *c as i64)
        .collect();
    assert_eq!(rain, (0..2).collect());
}

#[test]
fn test_split_sizes_and_schema_order() {
    let p = pipeline();
    let mut processor = DatasetProcessor::new(&p.artifacts, &p.training).unwrap();
    processor.run().unwrap();

    let x_train = load_matrix(&p.artifacts.x_train_path());
    let x_test = load_matrix(&p.artifacts.x_test_path());
    let y_train = load_labels(&p.artifacts.y_train_path());
    let y_test = load_labels(&p.artifacts.y_test_path());

    // 10 rows at test_fraction 0.2
    assert_eq!(x_train.rows.len(), 8);
    assert_eq!(x_test.rows.len(), 2);
    assert_eq!(y_train.values.len(), 8);
    assert_eq!(y_test.values.len(), 2);
    assert_eq!(y_train.name, "RainTomorrow");

    // Feature columns keep CSV order with the date expansion appended and
    // the target removed.
    let expected = [
        "Location",
        "MinTemp",
        "MaxTemp",
        "Rainfall",
        "WindGustDir",
        "WindDir9am",
        "WindDir3pm",
        "Humidity3pm",
        "RainToday",
        "Year",
        "Month",
        "Day",
    ];
    assert_eq!(x_train.columns, expected);
    assert_eq!(x_test.columns, expected);
    for row in x_train.rows.iter().chain(&x_test.rows) {
        assert_eq!(row.len(), expected.len());
    }
}

#[test]
fn test_split_is_reproducible_for_fixed_seed() {
    let p = pipeline();
    let mut processor = DatasetProcessor::new(&p.artifacts, &p.training).unwrap();
    processor.run().unwrap();
    let first = load_matrix(&p.artifacts.x_train_path());

    let mut processor = DatasetProcessor::new(&p.artifacts, &p.training).unwrap();
    processor.run().unwrap();
    let second = load_matrix(&p.artifacts.x_train_path());

    assert_eq!(first.rows, second.rows);
}

#[test]
fn test_missing_csv_aborts_with_load_error() {
    let p = pipeline();
    let artifacts = ArtifactsConfig {
        raw_data_path: "does/not/exist.csv".to_string(),
        ..p.artifacts
    };
    let mut processor = DatasetProcessor::new(&artifacts, &p.training).unwrap();
    match processor.run() {
        Err(AppError::Data { stage, .. }) => assert_eq!(stage, "load"),
        other => panic!("expected data error, got {:?}", other.is_ok()),
    }
}

#[test]
fn test_trainer_fits_and_persists_model() {
    let p = pipeline();
    let mut processor = DatasetProcessor::new(&p.artifacts, &p.training).unwrap();
    processor.run().unwrap();

    let trainer = ModelTrainer::new(&p.artifacts, &p.training).unwrap();
    let report = trainer.run().unwrap();

    assert!(p.artifacts.model_path().exists());
    assert!(p.artifacts.model_vocab_path().exists());
    for score in [
        report.training_score,
        report.accuracy,
        report.precision,
        report.recall,
        report.f1,
    ] {
        assert!((0.0..=1.0).contains(&score));
    }
}

#[test]
fn test_trainer_without_artifacts_fails() {
    let p = pipeline();
    let trainer = ModelTrainer::new(&p.artifacts, &p.training).unwrap();
    match trainer.run() {
        Err(AppError::Data { stage, .. }) => assert_eq!(stage, "load-artifacts"),
        other => panic!("expected data error, got {:?}", other.is_ok()),
    }
}

#[test]
fn test_vocab_manifest_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vocab.json");
    let manifest = VocabManifest::serving();
    manifest.save(&path).unwrap();
    assert_eq!(VocabManifest::load(&path).unwrap(), manifest);
}

/// This file covers only a handful of locations and wind labels, so the
/// recorded vocabulary cannot match the serving tables; the loader must
/// reject the model rather than serve misaligned codes.
#[test]
fn test_model_load_rejects_diverging_vocabulary() {
    let p = pipeline();
    let mut processor = DatasetProcessor::new(&p.artifacts, &p.training).unwrap();
    processor.run().unwrap();
    ModelTrainer::new(&p.artifacts, &p.training)
        .unwrap()
        .run()
        .unwrap();

    match RainModel::load(&p.artifacts) {
        Err(AppError::VocabularyMismatch(msg)) => assert!(msg.contains("Location")),
        other => panic!("expected vocabulary mismatch, got {:?}", other.is_ok()),
    }
}

#[test]
fn test_model_load_accepts_matching_vocabulary() {
    let p = pipeline();
    let mut processor = DatasetProcessor::new(&p.artifacts, &p.training).unwrap();
    processor.run().unwrap();
    ModelTrainer::new(&p.artifacts, &p.training)
        .unwrap()
        .run()
        .unwrap();

    // Replace the recorded manifest with one matching the serving tables,
    // as a run over the full canonical dataset would produce.
    VocabManifest::serving()
        .save(&p.artifacts.model_vocab_path())
        .unwrap();

    let model = RainModel::load(&p.artifacts).unwrap();
    let obs = RawObservation::new(
        "Sydney",
        chrono::NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
        10.0,
        18.0,
        70.0,
        15.0,
        None,
    )
    .unwrap();
    let outlook = model.predict(&InferredFeatures::derive(&obs).encode());
    assert!(["Rain Tomorrow: Yes", "Rain Tomorrow: No"].contains(&outlook.label()));
}
