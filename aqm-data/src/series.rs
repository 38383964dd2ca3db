//! Time series assembled from single observations.

use crate::generator::generate_sample;
use aqm_core::{
    date_range::{DateRange, TimeSteps},
    sample::Sample,
    station::StationDirectory,
};
use aqm_utils::dates::midnight_utc;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use log::debug;
use rand::Rng;

/// Hours of the day (UTC) at which historical samples are taken.
pub const HISTORICAL_HOURS: [i64; 4] = [0, 6, 12, 18];

/// `hours` hourly samples for `station_id`, oldest first, the last one at `now`.
pub fn past_window<R: Rng + ?Sized>(
    rng: &mut R,
    station_id: &str,
    now: DateTime<Utc>,
    hours: usize,
) -> Vec<Sample> {
    TimeSteps::hours_ending_at(now, hours)
        .map(|ts| generate_sample(rng, station_id, ts))
        .collect()
}

/// One sample per directory station, all stamped `now`.
pub fn realtime_snapshot<R: Rng + ?Sized>(
    rng: &mut R,
    directory: &StationDirectory,
    now: DateTime<Utc>,
) -> Vec<Sample> {
    directory
        .all()
        .iter()
        .map(|station| generate_sample(rng, &station.id, now))
        .collect()
}

/// Four samples a day from `start` through `end` inclusive.
///
/// A reversed range yields an empty series rather than an error.
pub fn historical_range<R: Rng + ?Sized>(
    rng: &mut R,
    station_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Sample> {
    let days = DateRange(start, end);
    let mut samples = Vec::with_capacity(days.day_count() * HISTORICAL_HOURS.len());
    for day in days {
        let midnight = midnight_utc(&day);
        for hour in HISTORICAL_HOURS {
            samples.push(generate_sample(
                rng,
                station_id,
                midnight + TimeDelta::hours(hour),
            ));
        }
    }
    debug!(
        "Generated {} historical samples for {} ({} to {})",
        samples.len(),
        station_id,
        start,
        end
    );
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_past_window_is_hourly_and_ends_now() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let window = past_window(&mut rng, "station-001", now, 24);
        assert_eq!(window.len(), 24);
        assert_eq!(window.last().unwrap().timestamp, now);
        assert!(window
            .windows(2)
            .all(|w| w[1].timestamp - w[0].timestamp == TimeDelta::hours(1)));
    }

    #[test]
    fn test_past_window_of_zero_hours() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap();
        assert!(past_window(&mut StdRng::seed_from_u64(1), "station-001", now, 0).is_empty());
    }

    #[test]
    fn test_realtime_covers_every_station() {
        let directory = StationDirectory::embedded().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap();
        let snapshot = realtime_snapshot(&mut StdRng::seed_from_u64(2), &directory, now);
        assert_eq!(snapshot.len(), directory.len());
        let ids: Vec<_> = snapshot.iter().map(|s| s.station_id.clone()).collect();
        assert_eq!(ids, directory.ids());
        assert!(snapshot.iter().all(|s| s.timestamp == now));
    }

    #[test]
    fn test_historical_three_days() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let samples = historical_range(&mut StdRng::seed_from_u64(3), "station-002", start, end);
        assert_eq!(samples.len(), 12);
        for sample in &samples {
            assert!([0, 6, 12, 18].contains(&sample.timestamp.hour()));
            assert_eq!(sample.timestamp.minute(), 0);
        }
        assert!(samples.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(samples[0].timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(samples[11].timestamp, Utc.with_ymd_and_hms(2024, 1, 3, 18, 0, 0).unwrap());
    }

    #[test]
    fn test_historical_reversed_range_is_empty() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(historical_range(&mut StdRng::seed_from_u64(3), "station-002", start, end).is_empty());
    }
}
