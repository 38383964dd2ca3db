//! Synthetic data generation for the air quality dashboard.
//!
//! Every generator here is a pure function of its inputs and an injected
//! random source (`&mut R where R: rand::Rng`), so a seeded `StdRng` makes
//! every artifact reproducible. Nothing performs I/O or blocks.
//!
//! - [`generator`]: single observations
//! - [`series`] and [`forecast`]: time series built from observations
//! - [`analytics`]: cluster, correlation, source attribution and trend artifacts
//! - [`alerts`]: threshold alerts derived from observations
//! - [`health`]: health-impact guidance lookups
//! - [`catalog`]: the fixed text catalogs the generators draw from

use thiserror::Error;

pub mod alerts;
pub mod analytics;
pub mod catalog;
pub mod forecast;
pub mod generator;
pub mod health;
pub mod series;

/// Returned when a string names no variant of one of the enumerations in
/// this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        ParseEnumError {
            kind,
            value: value.to_string(),
        }
    }
}
