//! User-supplied observation inputs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validation::{validate_range, validate_range_as_int, InvalidField};

/// Permitted range for a numeric input field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InputRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

pub const MIN_TEMP_RANGE: InputRange = InputRange {
    min: -10.0,
    max: 45.0,
    step: 0.1,
};

pub const MAX_TEMP_RANGE: InputRange = InputRange {
    min: -10.0,
    max: 50.0,
    step: 0.1,
};

pub const RAINFALL_RANGE: InputRange = InputRange {
    min: 0.0,
    max: 200.0,
    step: 0.1,
};

pub const HUMIDITY_RANGE: InputRange = InputRange {
    min: 0.0,
    max: 100.0,
    step: 1.0,
};

pub const WIND_SPEED_RANGE: InputRange = InputRange {
    min: 0.0,
    max: 100.0,
    step: 1.0,
};

/// The minimal set of values a caller provides for one prediction.
///
/// Immutable once constructed; `new` range-checks every field, so a value
/// that made it into a `RawObservation` is known to be valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawObservation {
    pub location: String,
    pub date: NaiveDate,
    pub min_temp: f64,
    pub max_temp: f64,
    pub humidity_3pm: i32,
    pub wind_speed_3pm: i32,
    pub rainfall: f64,
}

impl RawObservation {
    /// Build a validated observation. Humidity and wind speed are rounded
    /// to whole units; a missing rainfall reading defaults to 0 mm.
    pub fn new(
        location: impl Into<String>,
        date: NaiveDate,
        min_temp: f64,
        max_temp: f64,
        humidity_3pm: f64,
        wind_speed_3pm: f64,
        rainfall: Option<f64>,
    ) -> Result<Self, InvalidField> {
        let min_temp = validate_range("min_temp", min_temp, &MIN_TEMP_RANGE)?;
        let max_temp = validate_range("max_temp", max_temp, &MAX_TEMP_RANGE)?;
        let humidity_3pm = validate_range_as_int("humidity_3pm", humidity_3pm, &HUMIDITY_RANGE)?;
        let wind_speed_3pm =
            validate_range_as_int("wind_speed_3pm", wind_speed_3pm, &WIND_SPEED_RANGE)?;
        let rainfall = validate_range("rainfall", rainfall.unwrap_or(0.0), &RAINFALL_RANGE)?;

        Ok(Self {
            location: location.into(),
            date,
            min_temp,
            max_temp,
            humidity_3pm,
            wind_speed_3pm,
            rainfall,
        })
    }
}
