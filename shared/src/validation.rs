//! Input validation for observation fields
//!
//! Every user-supplied value is independently range-checked before any
//! feature derivation runs. Failures carry the field name so the caller
//! can surface a precise rejection.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::observation::InputRange;

/// A rejected input field with a human-readable reason
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct InvalidField {
    pub field: &'static str,
    pub message: String,
}

impl InvalidField {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate that a numeric field is finite and lies within its range.
pub fn validate_range(field: &'static str, value: f64, range: &InputRange) -> Result<f64, InvalidField> {
    if !value.is_finite() {
        return Err(InvalidField::new(field, "value must be numeric"));
    }
    if value < range.min || value > range.max {
        return Err(InvalidField::new(
            field,
            format!("{} out of range [{}, {}]", value, range.min, range.max),
        ));
    }
    Ok(value)
}

/// Validate a numeric field and round it to the nearest integer.
pub fn validate_range_as_int(
    field: &'static str,
    value: f64,
    range: &InputRange,
) -> Result<i32, InvalidField> {
    let value = validate_range(field, value, range)?;
    Ok(value.round() as i32)
}

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, InvalidField> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| InvalidField::new(field, "invalid format (expected YYYY-MM-DD)"))
}
