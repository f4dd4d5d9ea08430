//! Online inference flow: parse, derive, encode, predict
//!
//! One blocking model call per request; everything else is pure
//! computation over the shared tables.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use shared::models::features::InferredFeatures;
use shared::models::observation::RawObservation;
use shared::types::RainOutlook;
use shared::validation::parse_date;

use crate::error::AppResult;
use crate::services::model::RainModel;

/// Prediction request body
#[derive(Debug, Clone, Deserialize)]
pub struct PredictInput {
    pub location: String,
    /// ISO calendar date, YYYY-MM-DD
    pub date: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub humidity_3pm: f64,
    pub wind_speed_3pm: f64,
    #[serde(default)]
    pub rainfall: Option<f64>,
}

/// Prediction response body
#[derive(Debug, Serialize)]
pub struct PredictOutput {
    pub outlook: RainOutlook,
    pub will_rain: bool,
    pub label: &'static str,
    /// The derived feature set, echoed back for transparency
    pub features: InferredFeatures,
}

/// Inference service for the online prediction flow
#[derive(Clone)]
pub struct InferenceService {
    model: Arc<RainModel>,
}

impl InferenceService {
    /// Create a new InferenceService instance
    pub fn new(model: Arc<RainModel>) -> Self {
        Self { model }
    }

    /// Run one prediction: validate inputs, infer the full feature row,
    /// encode it, and consult the model.
    pub fn predict(&self, input: PredictInput) -> AppResult<PredictOutput> {
        let observation = parse_observation(&input)?;
        let features = InferredFeatures::derive(&observation);
        let row = features.encode();

        let outlook = self.model.predict(&row);
        tracing::info!(
            location = %observation.location,
            date = %observation.date,
            outlook = ?outlook,
            "Prediction successful"
        );

        Ok(PredictOutput {
            outlook,
            will_rain: outlook.will_rain(),
            label: outlook.label(),
            features,
        })
    }
}

/// Validate raw request fields into an observation.
fn parse_observation(input: &PredictInput) -> AppResult<RawObservation> {
    let date = parse_date("date", &input.date)?;
    let observation = RawObservation::new(
        input.location.clone(),
        date,
        input.min_temp,
        input.max_temp,
        input.humidity_3pm,
        input.wind_speed_3pm,
        input.rainfall,
    )?;
    Ok(observation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn input() -> PredictInput {
        PredictInput {
            location: "Sydney".to_string(),
            date: "2024-07-15".to_string(),
            min_temp: 10.0,
            max_temp: 18.0,
            humidity_3pm: 70.0,
            wind_speed_3pm: 15.0,
            rainfall: None,
        }
    }

    #[test]
    fn test_parse_observation_valid() {
        let observation = parse_observation(&input()).unwrap();
        assert_eq!(observation.location, "Sydney");
        assert_eq!(observation.rainfall, 0.0);
    }

    #[test]
    fn test_parse_observation_bad_date() {
        let bad = PredictInput {
            date: "July 15th".to_string(),
            ..input()
        };
        match parse_observation(&bad) {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "date"),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_parse_observation_out_of_range() {
        let bad = PredictInput {
            humidity_3pm: 150.0,
            ..input()
        };
        match parse_observation(&bad) {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "humidity_3pm"),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }
}
