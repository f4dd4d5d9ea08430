//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Southern-hemisphere season
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Summer,
    Autumn,
    Winter,
    Spring,
}

impl Season {
    /// Season for a calendar month (Dec/Jan/Feb = summer).
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Summer,
            3..=5 => Season::Autumn,
            6..=8 => Season::Winter,
            _ => Season::Spring,
        }
    }

    /// Typical daily sunshine hours for the season.
    pub fn sunshine_hours(&self) -> f64 {
        match self {
            Season::Summer => 9.0,
            Season::Autumn => 7.0,
            Season::Winter => 5.0,
            Season::Spring => 8.0,
        }
    }
}

/// Binary prediction outcome: will it rain tomorrow?
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RainOutlook {
    Rain,
    NoRain,
}

impl RainOutlook {
    pub fn will_rain(&self) -> bool {
        matches!(self, RainOutlook::Rain)
    }

    /// Human-readable label for the prediction result.
    pub fn label(&self) -> &'static str {
        match self {
            RainOutlook::Rain => "Rain Tomorrow: Yes",
            RainOutlook::NoRain => "Rain Tomorrow: No",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_from_month() {
        assert_eq!(Season::from_month(12), Season::Summer);
        assert_eq!(Season::from_month(1), Season::Summer);
        assert_eq!(Season::from_month(2), Season::Summer);
        assert_eq!(Season::from_month(3), Season::Autumn);
        assert_eq!(Season::from_month(5), Season::Autumn);
        assert_eq!(Season::from_month(6), Season::Winter);
        assert_eq!(Season::from_month(8), Season::Winter);
        assert_eq!(Season::from_month(9), Season::Spring);
        assert_eq!(Season::from_month(11), Season::Spring);
    }

    #[test]
    fn test_sunshine_hours_by_season() {
        assert_eq!(Season::Summer.sunshine_hours(), 9.0);
        assert_eq!(Season::Autumn.sunshine_hours(), 7.0);
        assert_eq!(Season::Winter.sunshine_hours(), 5.0);
        assert_eq!(Season::Spring.sunshine_hours(), 8.0);
    }

    #[test]
    fn test_outlook_labels() {
        assert!(RainOutlook::Rain.will_rain());
        assert!(!RainOutlook::NoRain.will_rain());
        assert_eq!(RainOutlook::Rain.label(), "Rain Tomorrow: Yes");
        assert_eq!(RainOutlook::NoRain.label(), "Rain Tomorrow: No");
    }
}
