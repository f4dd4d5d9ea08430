//! Prediction handlers

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use shared::models::observation::{
    InputRange, HUMIDITY_RANGE, MAX_TEMP_RANGE, MIN_TEMP_RANGE, RAINFALL_RANGE, WIND_SPEED_RANGE,
};
use shared::vocab::LOCATIONS;

use crate::error::AppResult;
use crate::services::inference::{InferenceService, PredictInput, PredictOutput};
use crate::AppState;

/// Run one rain prediction from a raw observation.
pub async fn predict(
    State(state): State<AppState>,
    Json(input): Json<PredictInput>,
) -> AppResult<Json<PredictOutput>> {
    let service = InferenceService::new(state.model.clone());
    let output = service.predict(input)?;
    Ok(Json(output))
}

/// Form metadata for prediction clients
#[derive(Serialize)]
pub struct PredictOptions {
    pub locations: Vec<&'static str>,
    pub ranges: FieldRanges,
    pub defaults: FieldDefaults,
}

#[derive(Serialize)]
pub struct FieldRanges {
    pub min_temp: InputRange,
    pub max_temp: InputRange,
    pub rainfall: InputRange,
    pub humidity_3pm: InputRange,
    pub wind_speed_3pm: InputRange,
}

#[derive(Serialize)]
pub struct FieldDefaults {
    pub location: &'static str,
    pub date: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub humidity_3pm: i32,
    pub wind_speed_3pm: i32,
    pub rainfall: f64,
}

/// Expose the location list, input ranges, and form defaults so clients
/// stay in lockstep with the server-side validation rules.
pub async fn predict_options() -> Json<PredictOptions> {
    Json(PredictOptions {
        locations: LOCATIONS.to_vec(),
        ranges: FieldRanges {
            min_temp: MIN_TEMP_RANGE,
            max_temp: MAX_TEMP_RANGE,
            rainfall: RAINFALL_RANGE,
            humidity_3pm: HUMIDITY_RANGE,
            wind_speed_3pm: WIND_SPEED_RANGE,
        },
        defaults: FieldDefaults {
            location: "Sydney",
            date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            min_temp: 13.0,
            max_temp: 23.0,
            humidity_3pm: 55,
            wind_speed_3pm: 20,
            rainfall: 0.0,
        },
    })
}
