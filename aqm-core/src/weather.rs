use serde::{Deserialize, Serialize};

/// Meteorological conditions recorded alongside a pollutant sample.
#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReadings {
    /// Air temperature in °C
    pub temperature: f64,
    /// Relative humidity in %
    pub humidity: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Direction the wind blows from, in degrees clockwise from north
    pub wind_direction: f64,
    /// Station pressure in hPa
    pub pressure: f64,
    /// Precipitation in mm
    pub precipitation: f64,
}

#[cfg(test)]
mod tests {
    use super::WeatherReadings;

    #[test]
    fn test_weather_field_names() {
        let weather = WeatherReadings {
            wind_speed: 3.5,
            wind_direction: 270.0,
            ..Default::default()
        };
        let value = serde_json::to_value(weather).unwrap();
        assert_eq!(value["windSpeed"], 3.5);
        assert_eq!(value["windDirection"], 270.0);
        assert!(value.get("wind_speed").is_none());
    }
}
