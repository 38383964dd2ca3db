//! AQI severity bands and the AQI formula.
//!
//! Bands are half-open intervals `(lo, hi]`, so an AQI of exactly 50 is
//! still `Good` and 51 is the first `Moderate` value.

use crate::pollutant::PollutantReadings;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Multiplier applied to PM2.5 to obtain the AQI.
pub const PM25_AQI_FACTOR: f64 = 1.8;

/// One of the six ordered AQI severity bands.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    #[serde(rename = "Unhealthy for Sensitive Groups")]
    UnhealthyForSensitiveGroups,
    Unhealthy,
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// Every band from least to most severe.
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Moderate,
        AqiCategory::UnhealthyForSensitiveGroups,
        AqiCategory::Unhealthy,
        AqiCategory::VeryUnhealthy,
        AqiCategory::Hazardous,
    ];

    /// Band containing `aqi`.
    pub fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthyForSensitiveGroups,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    /// Inclusive upper AQI bound of the band; `None` for `Hazardous`.
    pub fn upper_bound(self) -> Option<u32> {
        match self {
            AqiCategory::Good => Some(50),
            AqiCategory::Moderate => Some(100),
            AqiCategory::UnhealthyForSensitiveGroups => Some(150),
            AqiCategory::Unhealthy => Some(200),
            AqiCategory::VeryUnhealthy => Some(300),
            AqiCategory::Hazardous => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// AQI of a set of readings: `round(pm25 * 1.8)`, floored at zero.
pub fn compute_aqi(readings: &PollutantReadings) -> u32 {
    (readings.pm25 * PM25_AQI_FACTOR).round().max(0.0) as u32
}
