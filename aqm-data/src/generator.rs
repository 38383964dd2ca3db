//! Single-observation generator.

use aqm_core::{pollutant::PollutantReadings, sample::Sample, weather::WeatherReadings};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Exclusive upper bounds of the uniform draws for each pollutant.
pub const PM25_MAX: f64 = 150.0;
pub const PM10_MAX: f64 = 200.0;
pub const O3_MAX: f64 = 120.0;
pub const NO2_MAX: f64 = 100.0;
pub const SO2_MAX: f64 = 50.0;
pub const CO_MAX: f64 = 10.0;

/// Lowest temperature drawn, °C; the span above it is `TEMPERATURE_SPAN`.
pub const TEMPERATURE_MIN: f64 = -5.0;
pub const TEMPERATURE_SPAN: f64 = 35.0;
pub const PRESSURE_MIN: f64 = 970.0;
pub const PRESSURE_SPAN: f64 = 50.0;

/// `floor(U[0, max))`: whole-number reading below `max`.
pub(crate) fn whole<R: Rng + ?Sized>(rng: &mut R, max: f64) -> f64 {
    (rng.gen::<f64>() * max).floor()
}

/// Draw a full set of pollutant concentrations.
pub fn random_pollutants<R: Rng + ?Sized>(rng: &mut R) -> PollutantReadings {
    PollutantReadings {
        pm25: whole(rng, PM25_MAX),
        pm10: whole(rng, PM10_MAX),
        o3: whole(rng, O3_MAX),
        no2: whole(rng, NO2_MAX),
        so2: whole(rng, SO2_MAX),
        co: rng.gen::<f64>() * CO_MAX,
    }
}

/// Draw independent weather readings.
pub fn random_weather<R: Rng + ?Sized>(rng: &mut R) -> WeatherReadings {
    WeatherReadings {
        temperature: whole(rng, TEMPERATURE_SPAN) + TEMPERATURE_MIN,
        humidity: whole(rng, 100.0),
        wind_speed: rng.gen::<f64>() * 15.0,
        wind_direction: whole(rng, 360.0),
        pressure: whole(rng, PRESSURE_SPAN) + PRESSURE_MIN,
        precipitation: rng.gen::<f64>() * 20.0,
    }
}

/// Identifier of the form `<prefix>-<epoch millis>-<000..999>`.
pub fn random_id<R: Rng + ?Sized>(rng: &mut R, prefix: &str, at: &DateTime<Utc>) -> String {
    format!(
        "{}-{}-{:03}",
        prefix,
        at.timestamp_millis(),
        rng.gen_range(0..1000u32)
    )
}

/// Generate one synthetic observation for `station_id` at `timestamp`.
///
/// The station id is not checked against any directory.
pub fn generate_sample<R: Rng + ?Sized>(
    rng: &mut R,
    station_id: &str,
    timestamp: DateTime<Utc>,
) -> Sample {
    let pollutants = random_pollutants(rng);
    let weather = random_weather(rng);
    let id = random_id(rng, "data", &timestamp);
    Sample::new(id, station_id, timestamp, pollutants, weather)
}
