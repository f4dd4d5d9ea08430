//! Offline dataset preparation: load, clean, encode, split, persist
//!
//! A strictly sequential batch stage. Any failure wraps the underlying
//! cause with stage context and aborts the run; re-running from the start
//! is the only recovery path.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use shared::models::features::TARGET_COLUMN;

use crate::config::{ArtifactsConfig, TrainingConfig};
use crate::error::{AppError, AppResult};
use crate::services::model::VocabManifest;

/// Categorical columns label-encoded before the split.
pub const ENCODED_COLUMNS: [&str; 6] = [
    "Location",
    "WindGustDir",
    "WindDir9am",
    "WindDir3pm",
    "RainToday",
    "RainTomorrow",
];

const DATE_COLUMN: &str = "Date";

/// One column of the in-memory table, typed by sniffing the CSV: a column
/// is numeric when every non-missing cell parses as a float. Empty cells
/// and `NA` are missing.
#[derive(Debug, Clone)]
enum Column {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl Column {
    fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Text(values) => values.len(),
        }
    }

    fn is_missing(&self, row: usize) -> bool {
        match self {
            Column::Numeric(values) => values.get(row).map_or(true, Option::is_none),
            Column::Text(values) => values.get(row).map_or(true, Option::is_none),
        }
    }

    fn retain_rows(&mut self, keep: &[bool]) {
        match self {
            Column::Numeric(values) => {
                let mut it = keep.iter();
                values.retain(|_| *it.next().unwrap_or(&false));
            }
            Column::Text(values) => {
                let mut it = keep.iter();
                values.retain(|_| *it.next().unwrap_or(&false));
            }
        }
    }
}

/// Persisted feature matrix for one split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

/// Persisted label vector for one split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// Turns a raw historical CSV into encoded, split, persisted train/test
/// artifacts plus the vocabulary manifest recording the label encoders.
pub struct DatasetProcessor {
    artifacts: ArtifactsConfig,
    seed: u64,
    test_fraction: f64,
    headers: Vec<String>,
    columns: Vec<Column>,
}

impl DatasetProcessor {
    /// Create a new DatasetProcessor instance
    pub fn new(artifacts: &ArtifactsConfig, training: &TrainingConfig) -> AppResult<Self> {
        std::fs::create_dir_all(&artifacts.processed_dir)
            .map_err(|e| AppError::data("init", e))?;

        tracing::info!("Dataset processor initialised");
        Ok(Self {
            artifacts: artifacts.clone(),
            seed: training.seed,
            test_fraction: training.test_fraction,
            headers: Vec::new(),
            columns: Vec::new(),
        })
    }

    /// Execute the full pipeline in order: load, preprocess, encode, split.
    pub fn run(&mut self) -> AppResult<()> {
        self.load_data()?;
        self.preprocess()?;
        self.label_encode()?;
        self.split_data()?;
        tracing::info!("Data processing completed");
        Ok(())
    }

    /// Load the raw CSV into typed columns.
    pub fn load_data(&mut self) -> AppResult<()> {
        let mut reader = csv::Reader::from_path(&self.artifacts.raw_data_path)
            .map_err(|e| AppError::data("load", e))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::data("load", e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record.map_err(|e| AppError::data("load", e))?;
            for (i, field) in record.iter().enumerate() {
                let value = if field.is_empty() || field == "NA" {
                    None
                } else {
                    Some(field.to_string())
                };
                cells[i].push(value);
            }
        }

        self.columns = cells.into_iter().map(sniff_column).collect();
        self.headers = headers;

        tracing::info!(
            "Data loaded successfully. Shape: {} rows x {} columns",
            self.row_count(),
            self.headers.len()
        );
        Ok(())
    }

    /// Expand `Date` into Year/Month/Day, mean-impute numeric columns,
    /// then drop any row that still has a missing value.
    pub fn preprocess(&mut self) -> AppResult<()> {
        let date_idx = self
            .column_index(DATE_COLUMN)
            .ok_or_else(|| AppError::data("preprocess", "missing Date column"))?;

        let raw_dates = match self.columns.remove(date_idx) {
            Column::Text(values) => values,
            Column::Numeric(_) => {
                return Err(AppError::data("preprocess", "Date column is not textual"))
            }
        };
        self.headers.remove(date_idx);

        let mut years = Vec::with_capacity(raw_dates.len());
        let mut months = Vec::with_capacity(raw_dates.len());
        let mut days = Vec::with_capacity(raw_dates.len());
        for value in &raw_dates {
            match value {
                Some(raw) => {
                    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
                        AppError::data("preprocess", format!("bad date {:?}: {}", raw, e))
                    })?;
                    years.push(Some(date.year() as f64));
                    months.push(Some(date.month() as f64));
                    days.push(Some(date.day() as f64));
                }
                None => {
                    years.push(None);
                    months.push(None);
                    days.push(None);
                }
            }
        }
        self.headers.push("Year".to_string());
        self.columns.push(Column::Numeric(years));
        self.headers.push("Month".to_string());
        self.columns.push(Column::Numeric(months));
        self.headers.push("Day".to_string());
        self.columns.push(Column::Numeric(days));

        // Imputation is column-local: each numeric column fills with its
        // own mean, never a global one.
        for column in &mut self.columns {
            if let Column::Numeric(values) = column {
                let present: Vec<f64> = values.iter().flatten().copied().collect();
                if present.is_empty() {
                    continue;
                }
                let mean = present.iter().sum::<f64>() / present.len() as f64;
                for value in values.iter_mut() {
                    if value.is_none() {
                        *value = Some(mean);
                    }
                }
            }
        }

        let rows = self.row_count();
        let keep: Vec<bool> = (0..rows)
            .map(|row| self.columns.iter().all(|c| !c.is_missing(row)))
            .collect();
        for column in &mut self.columns {
            column.retain_rows(&keep);
        }

        tracing::info!(
            "Basic data preprocessing completed. {} of {} rows retained",
            self.row_count(),
            rows
        );
        Ok(())
    }

    /// Label-encode the categorical columns to 0..k-1 by sorted-label
    /// order, log each mapping, and persist the vocabulary manifest.
    pub fn label_encode(&mut self) -> AppResult<()> {
        let mut manifest = VocabManifest::default();

        for name in ENCODED_COLUMNS {
            let idx = self
                .column_index(name)
                .ok_or_else(|| AppError::data("label-encode", format!("missing column {}", name)))?;
            let values = match &self.columns[idx] {
                Column::Text(values) => values,
                Column::Numeric(_) => {
                    return Err(AppError::data(
                        "label-encode",
                        format!("column {} is not categorical", name),
                    ))
                }
            };

            let labels: Vec<String> = values
                .iter()
                .flatten()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .cloned()
                .collect();
            let codes: BTreeMap<&String, f64> = labels
                .iter()
                .enumerate()
                .map(|(code, label)| (label, code as f64))
                .collect();

            let encoded: Vec<Option<f64>> = values
                .iter()
                .map(|v| v.as_ref().and_then(|label| codes.get(label).copied()))
                .collect();

            tracing::info!(
                "Label mapping for {}: {:?}",
                name,
                labels.iter().enumerate().map(|(i, l)| (l.as_str(), i)).collect::<Vec<_>>()
            );
            manifest.record(name, labels);
            self.columns[idx] = Column::Numeric(encoded);
        }

        // Surface vocabulary drift at training time, not just at model load
        if let Err(divergence) = manifest.validate_against(&VocabManifest::serving()) {
            tracing::warn!(
                "Training vocabulary diverges from serving tables: {}",
                divergence
            );
        }

        let vocab_path = self.artifacts.processed_vocab_path();
        manifest.save(&vocab_path)?;
        tracing::info!(
            "Label encoding completed. Manifest persisted to {}",
            vocab_path.display()
        );
        Ok(())
    }

    /// Split rows into train/test with a fixed seed and persist the four
    /// resulting datasets.
    pub fn split_data(&mut self) -> AppResult<()> {
        let target_idx = self.column_index(TARGET_COLUMN).ok_or_else(|| {
            AppError::data("split", format!("missing target column {}", TARGET_COLUMN))
        })?;

        let mut feature_names = Vec::new();
        let mut feature_cols: Vec<&Vec<Option<f64>>> = Vec::new();
        for (i, (name, column)) in self.headers.iter().zip(&self.columns).enumerate() {
            if i == target_idx {
                continue;
            }
            match column {
                Column::Numeric(values) => {
                    feature_names.push(name.clone());
                    feature_cols.push(values);
                }
                Column::Text(_) => {
                    return Err(AppError::data(
                        "split",
                        format!("column {} is non-numeric after encoding", name),
                    ))
                }
            }
        }
        let target = match &self.columns[target_idx] {
            Column::Numeric(values) => values,
            Column::Text(_) => {
                return Err(AppError::data("split", "target column is not encoded"))
            }
        };

        let rows = target.len();
        tracing::info!("Feature columns: {:?}", feature_names);

        let mut indices: Vec<usize> = (0..rows).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);
        let test_len = (rows as f64 * self.test_fraction).round() as usize;
        let (test_idx, train_idx) = indices.split_at(test_len.min(rows));

        let gather_rows = |idx: &[usize]| -> Vec<Vec<f64>> {
            idx.iter()
                .map(|&row| {
                    feature_cols
                        .iter()
                        .map(|col| col[row].unwrap_or(0.0))
                        .collect()
                })
                .collect()
        };
        let gather_labels = |idx: &[usize]| -> Vec<f64> {
            idx.iter().map(|&row| target[row].unwrap_or(0.0)).collect()
        };

        persist_json(
            &self.artifacts.x_train_path(),
            &SplitMatrix {
                columns: feature_names.clone(),
                rows: gather_rows(train_idx),
            },
        )?;
        persist_json(
            &self.artifacts.x_test_path(),
            &SplitMatrix {
                columns: feature_names,
                rows: gather_rows(test_idx),
            },
        )?;
        persist_json(
            &self.artifacts.y_train_path(),
            &LabelColumn {
                name: TARGET_COLUMN.to_string(),
                values: gather_labels(train_idx),
            },
        )?;
        persist_json(
            &self.artifacts.y_test_path(),
            &LabelColumn {
                name: TARGET_COLUMN.to_string(),
                values: gather_labels(test_idx),
            },
        )?;

        tracing::info!(
            "Data split and persistence completed successfully. {} train / {} test rows",
            train_idx.len(),
            test_idx.len()
        );
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Values of a numeric column; missing cells come back as NaN.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        match &self.columns[idx] {
            Column::Numeric(values) => Some(
                values
                    .iter()
                    .map(|v| v.unwrap_or(f64::NAN))
                    .collect(),
            ),
            Column::Text(_) => None,
        }
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

fn sniff_column(values: Vec<Option<String>>) -> Column {
    let mut present = values.iter().flatten();
    let numeric =
        present.clone().next().is_some() && present.all(|v| v.parse::<f64>().is_ok());
    if numeric {
        Column::Numeric(
            values
                .into_iter()
                .map(|v| v.and_then(|s| s.parse().ok()))
                .collect(),
        )
    } else {
        Column::Text(values)
    }
}

fn persist_json<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let file = File::create(path)
        .map_err(|e| AppError::data("split", format!("{}: {}", path.display(), e)))?;
    serde_json::to_writer(BufWriter::new(file), value).map_err(|e| AppError::data("split", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_numeric_column() {
        let col = sniff_column(vec![Some("1.5".into()), None, Some("2".into())]);
        assert!(matches!(col, Column::Numeric(_)));
    }

    #[test]
    fn test_sniff_text_column() {
        let col = sniff_column(vec![Some("2008-12-01".into()), Some("2008-12-02".into())]);
        assert!(matches!(col, Column::Text(_)));

        // All-missing columns stay textual; there is nothing to impute from
        let col = sniff_column(vec![None, None]);
        assert!(matches!(col, Column::Text(_)));
    }

    #[test]
    fn test_retain_rows() {
        let mut col = Column::Numeric(vec![Some(1.0), Some(2.0), Some(3.0)]);
        col.retain_rows(&[true, false, true]);
        match col {
            Column::Numeric(values) => assert_eq!(values, vec![Some(1.0), Some(3.0)]),
            Column::Text(_) => panic!("column changed type"),
        }
    }
}
