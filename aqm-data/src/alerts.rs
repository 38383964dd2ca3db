//! Threshold alerts derived from observations.

use crate::{catalog::Catalogs, generator::random_id};
use aqm_core::{pollutant::Pollutant, sample::Sample, station::StationDirectory};
use chrono::{DateTime, Utc};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shown when a sample's station is not in the directory.
pub const UNKNOWN_DISTRICT: &str = "Unknown";

/// AQI cut-offs that decide whether a sample alerts and how severely.
///
/// All comparisons are strict: a sample at exactly `threshold` does not alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertBands {
    pub threshold: u32,
    pub danger_above: u32,
    pub emergency_above: u32,
}

impl Default for AlertBands {
    fn default() -> Self {
        AlertBands {
            threshold: 100,
            danger_above: 200,
            emergency_above: 300,
        }
    }
}

impl AlertBands {
    /// Tighter bands that escalate at 150 and 200.
    pub fn strict() -> Self {
        AlertBands {
            threshold: 100,
            danger_above: 150,
            emergency_above: 200,
        }
    }

    /// Severity for `aqi`, or `None` when it does not exceed the threshold.
    pub fn classify(&self, aqi: u32) -> Option<AlertType> {
        if aqi > self.emergency_above {
            Some(AlertType::Emergency)
        } else if aqi > self.danger_above {
            Some(AlertType::Danger)
        } else if aqi > self.threshold {
            Some(AlertType::Warning)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertType {
    Warning,
    Danger,
    Emergency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedArea {
    pub districts: Vec<String>,
    pub population: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub station_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub pollutant: Pollutant,
    /// AQI that triggered the alert.
    pub level: u32,
    pub message: String,
    pub recommendations: Vec<String>,
    pub affected: AffectedArea,
    /// Hours, 1 to 24.
    pub expected_duration: u32,
}

fn recommendations_for(catalogs: &Catalogs, alert_type: AlertType) -> Vec<String> {
    match alert_type {
        AlertType::Warning => catalogs.recommendations.warning.clone(),
        AlertType::Danger => catalogs.recommendations.danger.clone(),
        AlertType::Emergency => catalogs.recommendations.emergency.clone(),
    }
}

/// Alerts for every sample whose AQI exceeds `bands.threshold`, worst first.
///
/// Samples with equal AQI keep their input order.
pub fn derive_alerts<R: Rng + ?Sized>(
    rng: &mut R,
    samples: &[Sample],
    directory: &StationDirectory,
    catalogs: &Catalogs,
    bands: &AlertBands,
) -> Vec<Alert> {
    let mut triggered: Vec<(&Sample, AlertType)> = samples
        .iter()
        .filter_map(|sample| bands.classify(sample.aqi).map(|t| (sample, t)))
        .collect();
    triggered.sort_by(|a, b| b.0.aqi.cmp(&a.0.aqi));

    let alerts: Vec<Alert> = triggered
        .into_iter()
        .map(|(sample, alert_type)| {
            let station = directory.get(&sample.station_id);
            let station_name = station.map_or(sample.station_id.as_str(), |s| s.name.as_str());
            let district = station.map_or(UNKNOWN_DISTRICT, |s| s.location.district.as_str());
            Alert {
                id: random_id(rng, "alert", &sample.timestamp),
                station_id: sample.station_id.clone(),
                timestamp: sample.timestamp,
                alert_type,
                pollutant: sample.dominant_pollutant,
                level: sample.aqi,
                message: format!(
                    "{} concentration at {} is above the limit; current AQI is {} ({}).",
                    sample.dominant_pollutant.label(),
                    station_name,
                    sample.aqi,
                    sample.category
                ),
                recommendations: recommendations_for(catalogs, alert_type),
                affected: AffectedArea {
                    districts: vec![district.to_string()],
                    population: catalogs.affected_population.clone(),
                },
                expected_duration: rng.gen_range(1..=24),
            }
        })
        .collect();
    if !alerts.is_empty() {
        info!("Derived {} alerts from {} samples", alerts.len(), samples.len());
    }
    alerts
}
