//! Artificial per-endpoint response delay.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The facade's endpoints, one per public method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    AllStations,
    Station,
    Realtime,
    StationRealtime,
    PastWindow,
    Historical,
    Forecast,
    AdvancedPrediction,
    Alerts,
    HealthImpacts,
    Clusters,
    Correlations,
    Attribution,
    Trend,
}

impl Endpoint {
    /// Nominal latency before jitter, in milliseconds.
    pub fn base_latency_ms(self) -> u64 {
        match self {
            Endpoint::AllStations => 300,
            Endpoint::Station => 200,
            Endpoint::Realtime => 500,
            Endpoint::StationRealtime => 300,
            Endpoint::PastWindow => 700,
            Endpoint::Historical => 800,
            Endpoint::Forecast => 800,
            Endpoint::AdvancedPrediction => 1800,
            Endpoint::Alerts => 400,
            Endpoint::HealthImpacts => 400,
            Endpoint::Clusters => 1200,
            Endpoint::Correlations => 900,
            Endpoint::Attribution => 1500,
            Endpoint::Trend => 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub enabled: bool,
    /// Maximum relative deviation from the base latency.
    pub jitter_ratio: f64,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        LatencyConfig {
            enabled: true,
            jitter_ratio: 0.2,
            min_ms: 100,
            max_ms: 2000,
        }
    }
}

impl LatencyConfig {
    pub fn disabled() -> Self {
        LatencyConfig {
            enabled: false,
            ..Default::default()
        }
    }

    /// Delay for one call to `endpoint`, or `None` when latency is off.
    pub fn delay_for<R: Rng + ?Sized>(&self, rng: &mut R, endpoint: Endpoint) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        let base = endpoint.base_latency_ms() as f64;
        let jitter = self.jitter_ratio.abs();
        let factor = if jitter > 0.0 {
            1.0 + rng.gen_range(-jitter..jitter)
        } else {
            1.0
        };
        let (lo, hi) = (self.min_ms.min(self.max_ms), self.max_ms.max(self.min_ms));
        let ms = ((base * factor).round().max(0.0) as u64).clamp(lo, hi);
        Some(Duration::from_millis(ms))
    }
}

/// Sleep for the configured delay of `endpoint`.
///
/// Dropping the returned future cancels the wait.
pub async fn simulate(config: &LatencyConfig, endpoint: Endpoint) {
    let delay = config.delay_for(&mut rand::thread_rng(), endpoint);
    if let Some(delay) = delay {
        debug!("Simulating {:?} latency of {:?}", endpoint, delay);
        tokio::time::sleep(delay).await;
    }
}
