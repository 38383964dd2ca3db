use crate::{
    aqi::{compute_aqi, AqiCategory},
    pollutant::{Pollutant, PollutantReadings},
    weather::WeatherReadings,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One synthetic air quality observation for a station at an instant.
///
/// Build it with [`Sample::new`] so that `aqi`, `category` and
/// `dominant_pollutant` always agree with the readings.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub id: String,
    pub station_id: String,
    pub timestamp: DateTime<Utc>,
    pub aqi: u32,
    pub category: AqiCategory,
    pub dominant_pollutant: Pollutant,
    pub pollutants: PollutantReadings,
    pub weather: WeatherReadings,
}

impl Sample {
    /// Assemble a sample, deriving AQI, category and dominant pollutant.
    pub fn new(
        id: String,
        station_id: &str,
        timestamp: DateTime<Utc>,
        pollutants: PollutantReadings,
        weather: WeatherReadings,
    ) -> Self {
        let aqi = compute_aqi(&pollutants);
        Sample {
            id,
            station_id: station_id.to_string(),
            timestamp,
            aqi,
            category: AqiCategory::from_aqi(aqi),
            dominant_pollutant: pollutants.dominant(),
            pollutants,
            weather,
        }
    }

    /// True when the stored derived fields match the readings.
    pub fn is_consistent(&self) -> bool {
        self.aqi == compute_aqi(&self.pollutants)
            && self.category == AqiCategory::from_aqi(self.aqi)
            && self.dominant_pollutant == self.pollutants.dominant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_derives_fields() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let pollutants = PollutantReadings {
            pm25: 90.0,
            pm10: 20.0,
            o3: 10.0,
            no2: 5.0,
            so2: 1.0,
            co: 0.5,
        };
        let sample = Sample::new(
            "data-1".to_string(),
            "station-001",
            ts,
            pollutants,
            WeatherReadings::default(),
        );
        assert_eq!(sample.aqi, 162);
        assert_eq!(sample.category, AqiCategory::Unhealthy);
        assert_eq!(sample.dominant_pollutant, Pollutant::Pm25);
        assert!(sample.is_consistent());
    }

    #[test]
    fn test_serialized_shape() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap();
        let sample = Sample::new(
            "data-2".to_string(),
            "station-002",
            ts,
            PollutantReadings::default(),
            WeatherReadings::default(),
        );
        let value = serde_json::to_value(&sample).unwrap();
        assert_eq!(value["stationId"], "station-002");
        assert_eq!(value["dominantPollutant"], "pm25");
        assert_eq!(value["category"], "Good");
        assert_eq!(value["timestamp"], "2024-01-01T06:00:00Z");
    }
}
