//! Pollution source attribution.

use crate::{
    catalog::{Catalogs, SourceArchetype},
    generator::random_id,
};
use chrono::{DateTime, Utc};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

pub const ATTRIBUTION_METHODOLOGY: &str = "Receptor model combined with source analysis";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceContribution {
    pub source_type: String,
    /// Fraction of the total, a whole percent expressed in `[0, 1]`.
    pub contribution: f64,
    pub confidence: f64,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAttributionAnalysis {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub station_id: String,
    pub timestamp: DateTime<Utc>,
    pub sources: Vec<SourceContribution>,
    pub methodology: String,
    pub uncertainty: f64,
}

/// Split 100 % into `count` whole-percent shares of at least 1 % each.
///
/// Every share but the last is `floor(U * remaining * 0.8)`, raised to 1 %
/// and capped so the sources after it still get 1 % each. The last share
/// takes whatever is left.
fn allocate_percentages<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<u32> {
    if count == 0 {
        return Vec::new();
    }
    let mut remaining: u32 = 100;
    let mut shares = Vec::with_capacity(count);
    for i in 0..count - 1 {
        let later = (count - 1 - i) as u32;
        let drawn = (rng.gen::<f64>() * f64::from(remaining) * 0.8).floor() as u32;
        let share = drawn.clamp(1, remaining.saturating_sub(later).max(1));
        shares.push(share);
        remaining -= share;
    }
    shares.push(remaining);
    shares
}

/// Attribute the pollution at `station_id` to three to five catalog sources.
pub fn source_attribution<R: Rng + ?Sized>(
    rng: &mut R,
    catalogs: &Catalogs,
    station_id: &str,
    timestamp: DateTime<Utc>,
    generated_at: DateTime<Utc>,
) -> SourceAttributionAnalysis {
    let mut pool: Vec<&SourceArchetype> = catalogs.source_archetypes.iter().collect();
    pool.shuffle(rng);
    let count = rng.gen_range(3..=5).min(pool.len());

    let sources = pool
        .into_iter()
        .take(count)
        .zip(allocate_percentages(rng, count))
        .map(|(source, percent)| SourceContribution {
            source_type: source.source_type.clone(),
            contribution: f64::from(percent) / 100.0,
            confidence: rng.gen_range(0.6..0.9),
            details: source.details.clone(),
        })
        .collect();

    SourceAttributionAnalysis {
        id: random_id(rng, "attr", &generated_at),
        generated_at,
        station_id: station_id.to_string(),
        timestamp,
        sources,
        methodology: ATTRIBUTION_METHODOLOGY.to_string(),
        uncertainty: rng.gen_range(0.1..0.25),
    }
}
