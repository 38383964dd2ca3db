//! Pseudo-analytics artifacts.
//!
//! These only have the shape of analysis results: every number is drawn from
//! the injected random source and the algorithm names are display labels.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod attribution;
pub mod cluster;
pub mod correlation;
pub mod trend;

/// Inclusive calendar window an analysis claims to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        TimeRange { start, end }
    }
}

/// Order-preserving copy of `ids` with repeats removed.
pub(crate) fn distinct_ids(ids: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(id.clone());
        }
    }
    seen
}
