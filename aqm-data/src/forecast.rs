//! Hourly AQI forecasts.
//!
//! The curve is a slowly drifting base value shaped by three multiplicative
//! factors: a diurnal wave peaking in the local afternoon, a rain dip on the
//! third and fourth day, and lighter weekend traffic. Local time is read from
//! the origin's fixed UTC offset.

use aqm_core::{
    aqi::AqiCategory,
    pollutant::{Pollutant, PollutantReadings},
};
use aqm_utils::numeric::round_to;
use chrono::{DateTime, Datelike, FixedOffset, TimeDelta, Timelike, Utc, Weekday};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const FORECAST_METHOD: &str =
    "Deep learning model + meteorological, traffic and historical pattern analysis";

/// Pollutants a forecast may name as dominant; CO never is.
pub const DOMINANT_CANDIDATES: [Pollutant; 5] = [
    Pollutant::Pm25,
    Pollutant::Pm10,
    Pollutant::O3,
    Pollutant::No2,
    Pollutant::So2,
];

const RAIN_FACTOR: f64 = 0.7;
const WEEKEND_FACTOR: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub aqi: u32,
    pub category: AqiCategory,
    pub dominant_pollutant: Pollutant,
    pub pollutants: PollutantReadings,
    /// Falls from 0.95 towards 0.45 across the horizon.
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastAccuracy {
    pub historical: f64,
    pub recent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub station_id: String,
    pub generated_at: DateTime<Utc>,
    pub predictions: Vec<ForecastPoint>,
    pub forecast_method: String,
    pub accuracy: ForecastAccuracy,
}

/// `sin((hour - 6) * π / 12) * 0.3 + 1`: lowest at midnight, highest at noon.
pub fn diurnal_factor(local_hour: u32) -> f64 {
    ((f64::from(local_hour) - 6.0) * PI / 12.0).sin() * 0.3 + 1.0
}

fn rain_factor(step: usize) -> f64 {
    match step / 24 {
        2 | 3 => RAIN_FACTOR,
        _ => 1.0,
    }
}

fn weekend_factor(weekday: Weekday) -> f64 {
    match weekday {
        Weekday::Sat | Weekday::Sun => WEEKEND_FACTOR,
        _ => 1.0,
    }
}

/// Concentrations consistent with `aqi`, with `dominant` pushed above the rest.
fn biased_pollutants<R: Rng + ?Sized>(
    rng: &mut R,
    aqi: f64,
    dominant: Pollutant,
) -> PollutantReadings {
    let mut pick = |pollutant: Pollutant, high: f64, floor: f64, spread: f64| {
        if pollutant == dominant {
            high
        } else {
            floor + aqi * spread * rng.gen::<f64>()
        }
    };
    let pm25 = pick(Pollutant::Pm25, aqi * 0.6, 0.0, 0.3);
    let pm10 = pick(Pollutant::Pm10, aqi * 1.2, 0.0, 0.7);
    let o3 = pick(Pollutant::O3, 40.0 + aqi * 0.7, 20.0, 0.3);
    let no2 = pick(Pollutant::No2, 30.0 + aqi * 0.5, 10.0, 0.2);
    let so2 = pick(Pollutant::So2, 20.0 + aqi * 0.4, 5.0, 0.1);
    let co = 0.5 + aqi * 0.02 * rng.gen::<f64>();
    PollutantReadings {
        pm25: pm25.round(),
        pm10: pm10.round(),
        o3: o3.round(),
        no2: no2.round(),
        so2: so2.round(),
        co: round_to(co, 1),
    }
}

/// Hourly forecast for `station_id` covering `horizon_hours` after `origin`.
///
/// The first point is one hour after `origin`. The dominant pollutant is
/// drawn once and shared by every point.
pub fn forecast_series<R: Rng + ?Sized>(
    rng: &mut R,
    station_id: &str,
    origin: DateTime<FixedOffset>,
    horizon_hours: u32,
) -> Forecast {
    let horizon = horizon_hours as usize;
    let mut base = 70.0 + rng.gen::<f64>() * 30.0;
    let dominant = DOMINANT_CANDIDATES[rng.gen_range(0..DOMINANT_CANDIDATES.len())];

    let mut predictions = Vec::with_capacity(horizon);
    for step in 0..horizon {
        let local = origin + TimeDelta::hours(step as i64 + 1);
        let factor =
            diurnal_factor(local.hour()) * rain_factor(step) * weekend_factor(local.weekday());
        let aqi = (base * factor).round().max(0.0);
        base += rng.gen_range(-1.0..1.0);

        let aqi_value = aqi as u32;
        predictions.push(ForecastPoint {
            timestamp: local.with_timezone(&Utc),
            aqi: aqi_value,
            category: AqiCategory::from_aqi(aqi_value),
            dominant_pollutant: dominant,
            pollutants: biased_pollutants(rng, aqi, dominant),
            confidence: round_to(0.95 - (step as f64 / horizon as f64) * 0.5, 2),
        });
    }

    Forecast {
        station_id: station_id.to_string(),
        generated_at: origin.with_timezone(&Utc),
        predictions,
        forecast_method: FORECAST_METHOD.to_string(),
        accuracy: ForecastAccuracy {
            historical: 0.82 + rng.gen::<f64>() * 0.08,
            recent: 0.88 + rng.gen::<f64>() * 0.07,
        },
    }
}
