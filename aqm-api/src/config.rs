//! Facade configuration, loadable from a JSON file.

use crate::latency::LatencyConfig;
use anyhow::{bail, Context};
use aqm_data::{alerts::AlertBands, catalog::Catalogs};
use chrono::{FixedOffset, Offset, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Minutes east of UTC used for forecast local time (UTC+8).
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 480;
pub const DEFAULT_FORECAST_DAYS: u32 = 7;
/// Longest advanced prediction a caller may request.
pub const DEFAULT_MAX_FORECAST_DAYS: u32 = 30;
/// Longest date range, in days, accepted by the historical and trend endpoints.
pub const DEFAULT_MAX_RANGE_DAYS: u32 = 3660;
/// Hard ceilings on the two limits above, applied even to configs built in code.
pub const FORECAST_DAYS_CEILING: u32 = 366;
pub const RANGE_DAYS_CEILING: u32 = 36_600;

/// Every field falls back to its default when missing from the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Seed for the facade's random source; entropy when absent.
    pub seed: Option<u64>,
    pub latency: LatencyConfig,
    pub alert_bands: AlertBands,
    pub utc_offset_minutes: i32,
    /// Horizon of the advanced prediction when the caller gives none.
    pub forecast_days: u32,
    pub max_forecast_days: u32,
    pub max_range_days: u32,
    pub catalogs: Catalogs,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            seed: None,
            latency: LatencyConfig::default(),
            alert_bands: AlertBands::default(),
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            forecast_days: DEFAULT_FORECAST_DAYS,
            max_forecast_days: DEFAULT_MAX_FORECAST_DAYS,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
            catalogs: Catalogs::default(),
        }
    }
}

impl ApiConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: ApiConfig = serde_json::from_str(json).context("parsing API config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded API config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).is_none() {
            bail!("utc_offset_minutes {} is out of range", self.utc_offset_minutes);
        }
        let bands = &self.alert_bands;
        if !(bands.threshold <= bands.danger_above && bands.danger_above <= bands.emergency_above) {
            bail!("alert bands must be ordered threshold <= danger_above <= emergency_above");
        }
        if self.max_forecast_days > FORECAST_DAYS_CEILING || self.max_range_days > RANGE_DAYS_CEILING {
            bail!(
                "max_forecast_days may not exceed {} and max_range_days may not exceed {}",
                FORECAST_DAYS_CEILING,
                RANGE_DAYS_CEILING
            );
        }
        if self.forecast_days == 0 || self.forecast_days > self.max_forecast_days {
            bail!(
                "forecast_days {} must be between 1 and max_forecast_days {}",
                self.forecast_days,
                self.max_forecast_days
            );
        }
        self.catalogs.validate()?;
        Ok(())
    }

    /// Fixed offset used for forecast local time; UTC if out of range.
    pub fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn without_latency(mut self) -> Self {
        self.latency = LatencyConfig::disabled();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert!(config.latency.enabled);
        assert_eq!(config.alert_bands, AlertBands::default());
        assert_eq!(config.local_offset().local_minus_utc(), 8 * 3600);
        assert_eq!(config.forecast_days, 7);
        assert_eq!(config.max_forecast_days, 30);
        assert!(!config.without_latency().latency.enabled);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ApiConfig::from_json_str(
            r#"{"seed": 42, "latency": {"enabled": false}, "alert_bands": {"threshold": 100, "danger_above": 150, "emergency_above": 200}}"#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert!(!config.latency.enabled);
        assert_eq!(config.latency.max_ms, 2000);
        assert_eq!(config.alert_bands, AlertBands::strict());
        assert_eq!(config.utc_offset_minutes, DEFAULT_UTC_OFFSET_MINUTES);
        assert_eq!(config.catalogs.source_archetypes.len(), 7);
    }

    #[test]
    fn test_rejects_bad_offset_and_bands() {
        assert!(ApiConfig::from_json_str(r#"{"utc_offset_minutes": 100000}"#).is_err());
        assert!(ApiConfig::from_json_str(
            r#"{"alert_bands": {"threshold": 300, "danger_above": 200, "emergency_above": 100}}"#
        )
        .is_err());
        assert!(ApiConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_rejects_undersized_catalogs() {
        let err = ApiConfig::from_json_str(r#"{"catalogs": {"source_archetypes": []}}"#).unwrap_err();
        assert!(format!("{err:#}").contains("source_archetypes"));
        assert!(
            ApiConfig::from_json_str(r#"{"catalogs": {"characteristic_templates": ["Only one"]}}"#)
                .is_err()
        );
        assert!(ApiConfig::from_json_str(r#"{"catalogs": {"variable_pairs": []}}"#).is_err());
    }

    #[test]
    fn test_rejects_forecast_days_out_of_bounds() {
        assert!(ApiConfig::from_json_str(r#"{"forecast_days": 0}"#).is_err());
        assert!(ApiConfig::from_json_str(r#"{"forecast_days": 31}"#).is_err());
        let config =
            ApiConfig::from_json_str(r#"{"forecast_days": 60, "max_forecast_days": 90}"#).unwrap();
        assert_eq!(config.forecast_days, 60);
        assert!(ApiConfig::from_json_str(r#"{"max_forecast_days": 4294967295}"#).is_err());
        assert!(ApiConfig::from_json_str(r#"{"max_range_days": 1000000}"#).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = ApiConfig::from_json_file(Path::new("/no/such/aqm-config.json")).unwrap_err();
        assert!(format!("{err:#}").contains("reading config file"));
    }
}
