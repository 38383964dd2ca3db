//! Long-term trend decomposition.
//!
//! Each point splits into a linear trend, an optional seasonal wave, noise
//! and, after a breakpoint, a step in the direction of the trend.

use crate::{catalog::Catalogs, generator::random_id, ParseEnumError};
use aqm_core::pollutant::Pollutant;
use aqm_utils::{
    dates::{add_months, midnight_utc, months_between},
    numeric::round_to,
};
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use log::debug;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::{f64::consts::PI, fmt, str::FromStr};

pub const TREND_METHODOLOGY: &str = "Time series decomposition and trend analysis";

/// Fewest points a trend analysis ever reports.
pub const MIN_DATA_POINTS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendInterval {
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl FromStr for TrendInterval {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(TrendInterval::Day),
            "week" => Ok(TrendInterval::Week),
            "month" => Ok(TrendInterval::Month),
            "year" => Ok(TrendInterval::Year),
            _ => Err(ParseEnumError::new("trend interval", s)),
        }
    }
}

impl fmt::Display for TrendInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrendInterval::Day => "day",
            TrendInterval::Week => "week",
            TrendInterval::Month => "month",
            TrendInterval::Year => "year",
        };
        f.write_str(name)
    }
}

impl TrendInterval {
    /// Points needed to cover `start..end` at this interval, before the minimum is applied.
    fn raw_point_count(self, start: &NaiveDate, end: &NaiveDate) -> i64 {
        let days = (*end - *start).num_days();
        match self {
            TrendInterval::Day => days,
            // ceiling division
            TrendInterval::Week => (days + 6).div_euclid(7),
            TrendInterval::Month => months_between(start, end),
            TrendInterval::Year => i64::from(end.year() - start.year()) + 1,
        }
    }

    /// Number of data points for a range, never fewer than [`MIN_DATA_POINTS`].
    pub fn point_count(self, start: &NaiveDate, end: &NaiveDate) -> usize {
        let raw = self.raw_point_count(start, end);
        usize::try_from(raw).unwrap_or(0).max(MIN_DATA_POINTS)
    }

    /// The date `steps` intervals after `start`, saturating at `NaiveDate::MAX`.
    pub fn step_from(self, start: &NaiveDate, steps: usize) -> NaiveDate {
        let steps = steps as u64;
        let months = |n: u64| add_months(start, u32::try_from(n).unwrap_or(u32::MAX));
        match self {
            TrendInterval::Day => start
                .checked_add_days(Days::new(steps))
                .unwrap_or(NaiveDate::MAX),
            TrendInterval::Week => start
                .checked_add_days(Days::new(steps.saturating_mul(7)))
                .unwrap_or(NaiveDate::MAX),
            TrendInterval::Month => months(steps),
            TrendInterval::Year => months(steps.saturating_mul(12)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub const ALL: [TrendDirection; 3] = [
        TrendDirection::Increasing,
        TrendDirection::Decreasing,
        TrendDirection::Stable,
    ];

    /// Sign of the breakpoint step; stable trends have none.
    fn step_sign(self) -> f64 {
        match self {
            TrendDirection::Increasing => 1.0,
            TrendDirection::Decreasing => -1.0,
            TrendDirection::Stable => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub timestamp: DateTime<Utc>,
    pub significance: f64,
    pub possible_cause: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    pub direction: TrendDirection,
    pub change_rate: f64,
    pub seasonality: bool,
    pub breakpoints: Vec<Breakpoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendTimeRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval: TrendInterval,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub trend: f64,
    pub seasonal: f64,
    pub residual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub station_id: String,
    pub pollutant: Pollutant,
    pub time_range: TrendTimeRange,
    pub trend: TrendSummary,
    pub data_points: Vec<TrendPoint>,
    pub methodology: String,
}

/// Inclusive bounds of a breakpoint index strictly inside `(0.3n, 0.7n)`.
fn breakpoint_bounds(n: usize) -> (usize, usize) {
    (3 * n / 10 + 1, (7 * n + 9) / 10 - 1)
}

fn random_change_rate<R: Rng + ?Sized>(rng: &mut R, direction: TrendDirection) -> f64 {
    match direction {
        TrendDirection::Stable => rng.gen::<f64>() * 0.05,
        other => other.step_sign() * rng.gen_range(0.05..0.35),
    }
}

/// Decompose a synthetic `pollutant` series for `station_id` over `time_range`.
pub fn trend_analysis<R: Rng + ?Sized>(
    rng: &mut R,
    catalogs: &Catalogs,
    station_id: &str,
    pollutant: Pollutant,
    time_range: TrendTimeRange,
    generated_at: DateTime<Utc>,
) -> TrendAnalysis {
    let TrendTimeRange {
        start,
        end,
        interval,
    } = time_range;
    let n = interval.point_count(&start, &end);
    let direction = TrendDirection::ALL[rng.gen_range(0..TrendDirection::ALL.len())];
    let change_rate = random_change_rate(rng, direction);
    let seasonality = rng.gen_bool(0.7);

    let breakpoint_index = if rng.gen_bool(0.5) {
        let (lo, hi) = breakpoint_bounds(n);
        Some(rng.gen_range(lo..=hi))
    } else {
        None
    };
    let breakpoints: Vec<Breakpoint> = breakpoint_index
        .map(|idx| Breakpoint {
            timestamp: midnight_utc(&interval.step_from(&start, idx)),
            significance: rng.gen_range(0.7..1.0),
            possible_cause: catalogs
                .breakpoint_causes
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
        })
        .into_iter()
        .collect();

    let base = rng.gen_range(30.0..80.0);
    let amplitude = if seasonality { base * 0.3 } else { 0.0 };
    let period = n as f64 / 4.0;
    let step = base * 0.2 * direction.step_sign();

    let data_points = (0..n)
        .map(|i| {
            let x = i as f64;
            let trend = base + base * change_rate * (x / n as f64);
            let seasonal = amplitude * (x * 2.0 * PI / period).sin();
            let residual = rng.gen_range(-1.0..1.0) * base * 0.1;
            let shift = match breakpoint_index {
                Some(bp) if i > bp => step,
                _ => 0.0,
            };
            let value = (trend + seasonal + residual + shift).max(0.0);
            TrendPoint {
                timestamp: midnight_utc(&interval.step_from(&start, i)),
                value: round_to(value, 1),
                trend: round_to(trend, 1),
                seasonal: round_to(seasonal, 1),
                residual: round_to(residual, 1),
            }
        })
        .collect();
    debug!(
        "Built {} {} trend points for {} ({})",
        n, interval, station_id, pollutant
    );

    TrendAnalysis {
        id: random_id(rng, "trend", &generated_at),
        generated_at,
        station_id: station_id.to_string(),
        pollutant,
        time_range,
        trend: TrendSummary {
            direction,
            change_rate,
            seasonality,
            breakpoints,
        },
        data_points,
        methodology: TREND_METHODOLOGY.to_string(),
    }
}
