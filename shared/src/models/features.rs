//! Feature derivation and the ordered model schema
//!
//! Expands a minimal observation into every field the classifier expects,
//! using deterministic season/region heuristics, then encodes categoricals
//! into the fixed-position numeric row the model was trained on.

use chrono::Datelike;
use serde::Serialize;

use crate::models::observation::RawObservation;
use crate::types::Season;
use crate::vocab;

/// Column names in model schema order. Positions are load-bearing: the
/// classifier has no field names, only positions, so this order must match
/// the feature columns the offline pipeline persisted.
pub const FEATURE_COLUMNS: [&str; 24] = [
    "Location",
    "MinTemp",
    "MaxTemp",
    "Rainfall",
    "Evaporation",
    "Sunshine",
    "WindGustDir",
    "WindGustSpeed",
    "WindDir9am",
    "WindDir3pm",
    "WindSpeed9am",
    "WindSpeed3pm",
    "Humidity9am",
    "Humidity3pm",
    "Pressure9am",
    "Pressure3pm",
    "Cloud9am",
    "Cloud3pm",
    "Temp9am",
    "Temp3pm",
    "RainToday",
    "Year",
    "Month",
    "Day",
];

/// Target column of the offline dataset.
pub const TARGET_COLUMN: &str = "RainTomorrow";

/// Every model field, fully derived but not yet integer-encoded.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InferredFeatures {
    pub location: String,
    pub season: Season,
    pub min_temp: f64,
    pub max_temp: f64,
    pub rainfall: f64,
    pub evaporation: f64,
    pub sunshine: f64,
    /// Prevailing direction for the location; used for gust, 9am and 3pm.
    pub wind_dir: String,
    pub wind_gust_speed: i32,
    pub wind_speed_9am: i32,
    pub wind_speed_3pm: i32,
    pub humidity_9am: i32,
    pub humidity_3pm: i32,
    pub pressure_9am: f64,
    pub pressure_3pm: f64,
    pub cloud_9am: i32,
    pub cloud_3pm: i32,
    pub temp_9am: f64,
    pub temp_3pm: f64,
    pub rain_today: bool,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl InferredFeatures {
    /// Derive the full feature set from a validated observation.
    ///
    /// Pure function of the input and the static tables; reproducible.
    pub fn derive(obs: &RawObservation) -> Self {
        let season = Season::from_month(obs.date.month());
        let sunshine = season.sunshine_hours();

        // 3pm temperature tends towards the daily max, 9am towards the min;
        // both stay inside [min_temp, max_temp].
        let temp_3pm = ((obs.min_temp + 0.7 * obs.max_temp) / 1.7)
            .max(obs.min_temp)
            .min(obs.max_temp);
        let temp_9am = (0.6 * obs.min_temp + 0.4 * obs.max_temp)
            .min(obs.max_temp)
            .max(obs.min_temp);

        // Cloud cover in oktas (0-8), scaled from afternoon humidity.
        let cloud_3pm = ((obs.humidity_3pm as f64 / 100.0 * 8.0).round() as i32).clamp(0, 8);

        // Pressure: base 1015 hPa minus a small humidity adjustment, 1 dp.
        let pressure_3pm =
            ((1015.0 - 0.08 * (obs.humidity_3pm as f64 - 50.0)) * 10.0).round() / 10.0;

        let wind_dir = vocab::prevailing_direction(&obs.location).to_string();

        // Gusts run about 20 km/h over the 3pm wind, capped at 150.
        let wind_gust_speed = (obs.wind_speed_3pm + 20).max(obs.wind_speed_3pm).min(150);
        let wind_speed_9am = (obs.wind_speed_3pm - 3).max(0);

        let evaporation = (0.12 * sunshine + 0.03 * (obs.max_temp - obs.min_temp)).max(0.0);

        // Measurable rain today: anything over the 0.2 mm trace threshold.
        let rain_today = obs.rainfall > 0.2;

        Self {
            location: obs.location.clone(),
            season,
            min_temp: obs.min_temp,
            max_temp: obs.max_temp,
            rainfall: obs.rainfall,
            evaporation,
            sunshine,
            wind_dir,
            wind_gust_speed,
            wind_speed_9am,
            wind_speed_3pm: obs.wind_speed_3pm,
            humidity_9am: obs.humidity_3pm,
            humidity_3pm: obs.humidity_3pm,
            pressure_9am: pressure_3pm,
            pressure_3pm,
            cloud_9am: cloud_3pm,
            cloud_3pm,
            temp_9am,
            temp_3pm,
            rain_today,
            year: obs.date.year(),
            month: obs.date.month(),
            day: obs.date.day(),
        }
    }

    /// Encode categoricals and assemble the ordered numeric row.
    pub fn encode(&self) -> FeatureVector {
        let dir = vocab::encode_wind_direction(&self.wind_dir) as f64;

        FeatureVector([
            vocab::encode_location(&self.location) as f64,
            self.min_temp,
            self.max_temp,
            self.rainfall,
            self.evaporation,
            self.sunshine,
            dir,
            self.wind_gust_speed as f64,
            dir,
            dir,
            self.wind_speed_9am as f64,
            self.wind_speed_3pm as f64,
            self.humidity_9am as f64,
            self.humidity_3pm as f64,
            self.pressure_9am,
            self.pressure_3pm,
            self.cloud_9am as f64,
            self.cloud_3pm as f64,
            self.temp_9am,
            self.temp_3pm,
            vocab::encode_yes_no(self.rain_today) as f64,
            self.year as f64,
            self.month as f64,
            self.day as f64,
        ])
    }
}

/// A single encoded row in the exact training schema order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureVector(pub [f64; FeatureVector::LEN]);

impl FeatureVector {
    pub const LEN: usize = 24;

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
