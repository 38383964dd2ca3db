//! Async access facade over the synthetic data generators.
//!
//! [`AirQualityApi`] exposes one method per dashboard endpoint. Each call
//! waits out an artificial latency, then generates its payload and wraps it
//! in an [`ApiResponse`]. Failures never panic; they come back as
//! `success: false` envelopes carrying an [`ErrorCode`].

use aqm_core::{
    date_range::DateRange,
    pollutant::Pollutant,
    sample::Sample,
    station::{Station, StationDirectory},
};
use aqm_data::{
    alerts::{derive_alerts, Alert},
    analytics::{
        attribution::{source_attribution, SourceAttributionAnalysis},
        cluster::{cluster_analysis, ClusterAnalysis},
        correlation::{correlation_analysis, CorrelationAnalysis, CorrelationMethod},
        trend::{trend_analysis, TrendAnalysis, TrendInterval, TrendTimeRange},
        TimeRange,
    },
    forecast::{forecast_series, Forecast},
    generator::generate_sample,
    health::{find_health_impacts, HealthImpact, PopulationGroup},
    series::{historical_range, past_window, realtime_snapshot},
};
use aqm_utils::dates::{format_date, parse_date, parse_timestamp};
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use parking_lot::Mutex;
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;

pub mod config;
pub mod envelope;
pub mod latency;

pub use config::ApiConfig;
pub use envelope::{ApiError, ApiFailure, ApiResponse, EnvelopeError, ErrorCode};
use latency::Endpoint;

/// Hours covered by the past-window endpoint.
pub const PAST_WINDOW_HOURS: usize = 24;
/// Hours covered by the standard station forecast.
pub const STATION_FORECAST_HOURS: u32 = 24;

/// Where the facade reads the current time from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    System,
    /// Always reports the same instant.
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(ts) => *ts,
        }
    }
}

pub struct AirQualityApi {
    directory: Arc<StationDirectory>,
    config: ApiConfig,
    clock: Clock,
    rng: Mutex<StdRng>,
}

fn parse_day(field: &'static str, raw: &str) -> Result<NaiveDate, ApiFailure> {
    parse_date(raw).map_err(|e| ApiFailure::invalid(field, e))
}

fn parse_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), ApiFailure> {
    Ok((parse_day("start date", start)?, parse_day("end date", end)?))
}

impl AirQualityApi {
    /// Facade over the embedded station directory.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let directory = StationDirectory::embedded()?;
        Ok(Self::with_directory(Arc::new(directory), config))
    }

    pub fn with_directory(directory: Arc<StationDirectory>, config: ApiConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(
            "Air quality API ready: {} stations, seed {:?}, latency {}",
            directory.len(),
            config.seed,
            if config.latency.enabled { "on" } else { "off" }
        );
        AirQualityApi {
            directory,
            config,
            clock: Clock::System,
            rng: Mutex::new(rng),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn directory(&self) -> &StationDirectory {
        &self.directory
    }

    /// Run `f` with exclusive access to the random source. The lock is
    /// released before returning, so it is never held across an await.
    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock();
        f(&mut rng)
    }

    async fn respond<T>(
        &self,
        endpoint: Endpoint,
        build: impl FnOnce(&Self, DateTime<Utc>) -> Result<T, ApiFailure>,
    ) -> ApiResponse<T> {
        latency::simulate(&self.config.latency, endpoint).await;
        let now = self.clock.now();
        let result = build(self, now);
        if let Err(failure) = &result {
            info!("{:?} request failed: {}", endpoint, failure);
        }
        ApiResponse::from_result(result, now)
    }

    /// Reject ranges longer than `max_range_days`; reversed ranges pass as empty.
    fn bounded_range(&self, start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), ApiFailure> {
        let (start, end) = parse_range(start, end)?;
        let days = DateRange(start, end).day_count();
        let max = self.config.max_range_days.min(config::RANGE_DAYS_CEILING) as usize;
        if days > max {
            return Err(ApiFailure::invalid(
                "date range",
                format!(
                    "{} to {} spans {days} days, at most {max} allowed",
                    format_date(&start),
                    format_date(&end)
                ),
            ));
        }
        Ok((start, end))
    }

    fn require_station(&self, station_id: &str) -> Result<&Station, ApiFailure> {
        self.directory
            .get(station_id)
            .ok_or_else(|| ApiFailure::StationNotFound(station_id.to_string()))
    }

    pub async fn get_all_stations(&self) -> ApiResponse<Vec<Station>> {
        self.respond(Endpoint::AllStations, |api, _| {
            Ok(api.directory.all().to_vec())
        })
        .await
    }

    pub async fn get_station(&self, station_id: &str) -> ApiResponse<Station> {
        self.respond(Endpoint::Station, |api, _| {
            api.require_station(station_id).cloned()
        })
        .await
    }

    pub async fn get_realtime_air_quality(&self) -> ApiResponse<Vec<Sample>> {
        self.respond(Endpoint::Realtime, |api, now| {
            Ok(api.with_rng(|rng| realtime_snapshot(rng, &api.directory, now)))
        })
        .await
    }

    pub async fn get_station_realtime(&self, station_id: &str) -> ApiResponse<Sample> {
        self.respond(Endpoint::StationRealtime, |api, now| {
            if !api.directory.contains(station_id) {
                return Err(ApiFailure::NoRealtimeData(station_id.to_string()));
            }
            Ok(api.with_rng(|rng| generate_sample(rng, station_id, now)))
        })
        .await
    }

    /// The last 24 hourly samples for a station, ending now.
    pub async fn get_station_past_window(&self, station_id: &str) -> ApiResponse<Vec<Sample>> {
        self.respond(Endpoint::PastWindow, |api, now| {
            Ok(api.with_rng(|rng| past_window(rng, station_id, now, PAST_WINDOW_HOURS)))
        })
        .await
    }

    /// Four samples a day between two `YYYY-MM-DD` dates, inclusive.
    pub async fn get_historical_data(
        &self,
        station_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> ApiResponse<Vec<Sample>> {
        self.respond(Endpoint::Historical, |api, _| {
            let (start, end) = api.bounded_range(start_date, end_date)?;
            Ok(api.with_rng(|rng| historical_range(rng, station_id, start, end)))
        })
        .await
    }

    pub async fn get_station_forecast(&self, station_id: &str) -> ApiResponse<Forecast> {
        self.respond(Endpoint::Forecast, |api, now| {
            let origin = now.with_timezone(&api.config.local_offset());
            Ok(api.with_rng(|rng| {
                forecast_series(rng, station_id, origin, STATION_FORECAST_HOURS)
            }))
        })
        .await
    }

    /// Hourly forecast over `days` days, or the configured default.
    pub async fn get_advanced_prediction(
        &self,
        station_id: &str,
        days: Option<u32>,
    ) -> ApiResponse<Forecast> {
        self.respond(Endpoint::AdvancedPrediction, |api, now| {
            let days = days.unwrap_or(api.config.forecast_days);
            let max = api.config.max_forecast_days.min(config::FORECAST_DAYS_CEILING);
            if days == 0 || days > max {
                return Err(ApiFailure::invalid(
                    "days",
                    format!("{days} is outside 1..={max}"),
                ));
            }
            let origin = now.with_timezone(&api.config.local_offset());
            Ok(api.with_rng(|rng| {
                forecast_series(rng, station_id, origin, days.saturating_mul(24))
            }))
        })
        .await
    }

    /// Alerts raised by a fresh realtime snapshot, worst first.
    pub async fn get_current_alerts(&self) -> ApiResponse<Vec<Alert>> {
        self.respond(Endpoint::Alerts, |api, now| {
            Ok(api.with_rng(|rng| {
                let samples = realtime_snapshot(rng, &api.directory, now);
                derive_alerts(
                    rng,
                    &samples,
                    &api.directory,
                    &api.config.catalogs,
                    &api.config.alert_bands,
                )
            }))
        })
        .await
    }

    pub async fn get_health_impacts(
        &self,
        pollutant: Pollutant,
        concentration: f64,
        group: PopulationGroup,
    ) -> ApiResponse<Vec<HealthImpact>> {
        self.respond(Endpoint::HealthImpacts, |api, _| {
            Ok(find_health_impacts(
                &api.config.catalogs.health_impacts,
                pollutant,
                concentration,
                group,
            ))
        })
        .await
    }

    pub async fn get_cluster_analysis(
        &self,
        station_ids: &[String],
        start_date: &str,
        end_date: &str,
    ) -> ApiResponse<ClusterAnalysis> {
        self.respond(Endpoint::Clusters, |api, now| {
            let (start, end) = parse_range(start_date, end_date)?;
            Ok(api.with_rng(|rng| {
                cluster_analysis(
                    rng,
                    &api.config.catalogs,
                    station_ids,
                    TimeRange::new(start, end),
                    now,
                )
            }))
        })
        .await
    }

    pub async fn get_correlation_analysis(
        &self,
        station_ids: &[String],
        start_date: &str,
        end_date: &str,
        method: CorrelationMethod,
    ) -> ApiResponse<CorrelationAnalysis> {
        self.respond(Endpoint::Correlations, |api, now| {
            let (start, end) = parse_range(start_date, end_date)?;
            Ok(api.with_rng(|rng| {
                correlation_analysis(
                    rng,
                    &api.config.catalogs,
                    station_ids,
                    TimeRange::new(start, end),
                    method,
                    now,
                )
            }))
        })
        .await
    }

    /// Source attribution at an RFC 3339 instant (a bare date means midnight UTC).
    pub async fn get_source_attribution(
        &self,
        station_id: &str,
        timestamp: &str,
    ) -> ApiResponse<SourceAttributionAnalysis> {
        self.respond(Endpoint::Attribution, |api, now| {
            let at = parse_timestamp(timestamp).map_err(|e| ApiFailure::invalid("timestamp", e))?;
            Ok(api.with_rng(|rng| {
                source_attribution(rng, &api.config.catalogs, station_id, at, now)
            }))
        })
        .await
    }

    pub async fn get_trend_analysis(
        &self,
        station_id: &str,
        pollutant: Pollutant,
        start_date: &str,
        end_date: &str,
        interval: TrendInterval,
    ) -> ApiResponse<TrendAnalysis> {
        self.respond(Endpoint::Trend, |api, now| {
            let (start, end) = api.bounded_range(start_date, end_date)?;
            let time_range = TrendTimeRange {
                start,
                end,
                interval,
            };
            Ok(api.with_rng(|rng| {
                trend_analysis(
                    rng,
                    &api.config.catalogs,
                    station_id,
                    pollutant,
                    time_range,
                    now,
                )
            }))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqm_data::alerts::AlertType;
    use chrono::{TimeDelta, TimeZone, Timelike};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap()
    }

    fn api(seed: u64) -> AirQualityApi {
        let config = ApiConfig::default().with_seed(seed).without_latency();
        AirQualityApi::new(config)
            .unwrap()
            .with_clock(Clock::Fixed(fixed_now()))
    }

    #[tokio::test]
    async fn test_all_stations() {
        let response = api(1).get_all_stations().await;
        assert!(response.success);
        assert_eq!(response.data.unwrap().len(), 5);
        assert_eq!(response.timestamp, fixed_now());
    }

    #[tokio::test]
    async fn test_unknown_station_is_not_found() {
        let api = api(1);
        let response = api.get_station("nonexistent-id").await;
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error.unwrap().code, ErrorCode::NotFound);

        let response = api.get_station_realtime("nonexistent-id").await;
        assert_eq!(response.error.unwrap().code, ErrorCode::NotFound);

        let found = api.get_station("station-003").await.into_result().unwrap();
        assert_eq!(found.id, "station-003");
    }

    #[tokio::test]
    async fn test_other_endpoints_accept_any_station() {
        let api = api(2);
        let window = api.get_station_past_window("roaming-van").await.into_result().unwrap();
        assert_eq!(window.len(), PAST_WINDOW_HOURS);
        assert_eq!(window.last().unwrap().timestamp, fixed_now());
        assert!(window.iter().all(|s| s.station_id == "roaming-van"));
    }

    #[tokio::test]
    async fn test_bad_date_is_invalid_argument() {
        let api = api(3);
        let response = api.get_historical_data("station-001", "yesterday", "2024-01-03").await;
        assert!(!response.success);
        let error = response.error.unwrap();
        assert_eq!(error.code, ErrorCode::InvalidArgument);
        assert!(error.message.contains("start date"));

        let response = api.get_source_attribution("station-001", "noon").await;
        assert_eq!(response.error.unwrap().code, ErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn test_historical_and_reversed_range() {
        let api = api(4);
        let samples = api
            .get_historical_data("station-001", "2024-01-01", "2024-01-03")
            .await
            .into_result()
            .unwrap();
        assert_eq!(samples.len(), 12);
        assert!(samples.iter().all(|s| s.timestamp.hour() % 6 == 0));

        let response = api.get_historical_data("station-001", "2024-01-03", "2024-01-01").await;
        assert!(response.success);
        assert!(response.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_forecasts_use_local_offset() {
        let api = api(5);
        let forecast = api.get_station_forecast("station-001").await.into_result().unwrap();
        assert_eq!(forecast.predictions.len(), 24);
        assert_eq!(forecast.generated_at, fixed_now());
        assert_eq!(
            forecast.predictions[0].timestamp,
            fixed_now() + TimeDelta::hours(1)
        );

        let advanced = api
            .get_advanced_prediction("station-001", None)
            .await
            .into_result()
            .unwrap();
        assert_eq!(advanced.predictions.len(), 7 * 24);
        let three_days = api
            .get_advanced_prediction("station-001", Some(3))
            .await
            .into_result()
            .unwrap();
        assert_eq!(three_days.predictions.len(), 72);
    }

    #[tokio::test]
    async fn test_alerts_are_sorted_and_banded() {
        let api = api(6);
        for _ in 0..20 {
            let alerts = api.get_current_alerts().await.into_result().unwrap();
            assert!(alerts.windows(2).all(|w| w[0].level >= w[1].level));
            for alert in &alerts {
                assert!(alert.level > 100);
                let expected = api.config().alert_bands.classify(alert.level);
                assert_eq!(Some(alert.alert_type), expected);
                if alert.level <= 200 {
                    assert_eq!(alert.alert_type, AlertType::Warning);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_health_lookup() {
        let impacts = api(7)
            .get_health_impacts(Pollutant::Pm25, 80.0, PopulationGroup::Respiratory)
            .await
            .into_result()
            .unwrap();
        assert_eq!(impacts.len(), 2);
    }

    #[tokio::test]
    async fn test_analytics_endpoints() {
        let api = api(8);
        let ids = api.directory().ids();
        let clusters = api
            .get_cluster_analysis(&ids, "2024-01-01", "2024-01-31")
            .await
            .into_result()
            .unwrap();
        let total: usize = clusters.clusters.iter().map(|c| c.size).sum();
        assert_eq!(total, ids.len());

        let correlations = api
            .get_correlation_analysis(&ids, "2024-01-01", "2024-01-31", CorrelationMethod::Kendall)
            .await
            .into_result()
            .unwrap();
        assert_eq!(correlations.method, CorrelationMethod::Kendall);

        let attribution = api
            .get_source_attribution("station-002", "2024-01-01T12:00:00Z")
            .await
            .into_result()
            .unwrap();
        let sum: f64 = attribution.sources.iter().map(|s| s.contribution).sum();
        assert!((sum - 1.0).abs() < 1e-6);

        let trend = api
            .get_trend_analysis("station-002", Pollutant::O3, "2023-01-01", "2023-12-31", TrendInterval::Month)
            .await
            .into_result()
            .unwrap();
        assert!(trend.data_points.len() >= 10);
        assert_eq!(trend.generated_at, fixed_now());
    }

    #[tokio::test]
    async fn test_oversized_requests_are_invalid_argument() {
        let api = api(11);
        for days in [0, 31, u32::MAX] {
            let response = api.get_advanced_prediction("station-001", Some(days)).await;
            assert!(!response.success, "days {days}");
            assert!(response.data.is_none());
            assert_eq!(response.error.unwrap().code, ErrorCode::InvalidArgument);
        }
        let forecast = api
            .get_advanced_prediction("station-001", Some(30))
            .await
            .into_result()
            .unwrap();
        assert_eq!(forecast.predictions.len(), 30 * 24);

        let history = api.get_historical_data("station-001", "0001-01-01", "9999-12-31").await;
        let error = history.error.unwrap();
        assert_eq!(error.code, ErrorCode::InvalidArgument);
        assert!(error.message.contains("0001-01-01 to 9999-12-31"));
        let trend = api
            .get_trend_analysis("station-001", Pollutant::Pm25, "1900-01-01", "2024-01-01", TrendInterval::Day)
            .await;
        assert_eq!(trend.error.unwrap().code, ErrorCode::InvalidArgument);

        let within = api
            .get_trend_analysis("station-001", Pollutant::Pm25, "2015-01-01", "2024-12-31", TrendInterval::Week)
            .await;
        assert!(within.success);
    }

    #[tokio::test]
    async fn test_ceiling_applies_to_configs_built_in_code() {
        let mut config = ApiConfig::default().with_seed(3).without_latency();
        config.max_forecast_days = u32::MAX;
        let api = AirQualityApi::new(config)
            .unwrap()
            .with_clock(Clock::Fixed(fixed_now()));
        let response = api.get_advanced_prediction("station-001", Some(u32::MAX)).await;
        assert_eq!(response.error.unwrap().code, ErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn test_same_seed_same_payloads() {
        let a = api(99).get_realtime_air_quality().await;
        let b = api(99).get_realtime_air_quality().await;
        assert_eq!(a, b);
        let c = api(100).get_realtime_air_quality().await;
        assert_ne!(a.data, c.data);
    }

    #[tokio::test]
    async fn test_latency_is_applied() {
        let config = ApiConfig {
            seed: Some(1),
            ..Default::default()
        };
        let api = AirQualityApi::new(config).unwrap();
        let started = std::time::Instant::now();
        let response = api.get_station("station-001").await;
        assert!(response.success);
        // Station endpoint: 200 ms minus at most 20 % jitter
        assert!(started.elapsed() >= std::time::Duration::from_millis(150));
    }
}
