//! Variable-pair correlations.

use super::TimeRange;
use crate::{catalog::Catalogs, generator::random_id, ParseEnumError};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// p-values below this are reported as significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Coefficients closer to zero than this are labelled `No Correlation`.
pub const NO_CORRELATION_BELOW: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorrelationMethod {
    #[default]
    Pearson,
    Spearman,
    Kendall,
}

impl FromStr for CorrelationMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pearson" => Ok(CorrelationMethod::Pearson),
            "spearman" => Ok(CorrelationMethod::Spearman),
            "kendall" => Ok(CorrelationMethod::Kendall),
            _ => Err(ParseEnumError::new("correlation method", s)),
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CorrelationMethod::Pearson => "Pearson",
            CorrelationMethod::Spearman => "Spearman",
            CorrelationMethod::Kendall => "Kendall",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    #[serde(rename = "Strong Positive")]
    StrongPositive,
    #[serde(rename = "Moderate Positive")]
    ModeratePositive,
    #[serde(rename = "Weak Positive")]
    WeakPositive,
    #[serde(rename = "No Correlation")]
    NoCorrelation,
    #[serde(rename = "Weak Negative")]
    WeakNegative,
    #[serde(rename = "Moderate Negative")]
    ModerateNegative,
    #[serde(rename = "Strong Negative")]
    StrongNegative,
}

impl Relationship {
    /// Label a coefficient. Bands are open at the top: exactly 0.7 is
    /// moderate, exactly 0 is weak negative.
    pub fn classify(coefficient: f64) -> Self {
        if coefficient.abs() < NO_CORRELATION_BELOW {
            return Relationship::NoCorrelation;
        }
        if coefficient > 0.7 {
            Relationship::StrongPositive
        } else if coefficient > 0.3 {
            Relationship::ModeratePositive
        } else if coefficient > 0.0 {
            Relationship::WeakPositive
        } else if coefficient > -0.3 {
            Relationship::WeakNegative
        } else if coefficient > -0.7 {
            Relationship::ModerateNegative
        } else {
            Relationship::StrongNegative
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub variable1: String,
    pub variable2: String,
    pub coefficient: f64,
    #[serde(rename = "pValue")]
    pub p_value: f64,
    pub relationship: Relationship,
    pub significant: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationAnalysis {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub station_ids: Vec<String>,
    pub time_range: TimeRange,
    pub correlations: Vec<Correlation>,
    pub method: CorrelationMethod,
}

/// One correlation per catalog variable pair, in catalog order.
pub fn correlation_analysis<R: Rng + ?Sized>(
    rng: &mut R,
    catalogs: &Catalogs,
    station_ids: &[String],
    time_range: TimeRange,
    method: CorrelationMethod,
    generated_at: DateTime<Utc>,
) -> CorrelationAnalysis {
    let correlations = catalogs
        .variable_pairs
        .iter()
        .map(|pair| {
            let coefficient = rng.gen_range(-1.0..1.0) * 0.95;
            let p_value = rng.gen::<f64>() * 0.1;
            Correlation {
                variable1: pair.variable1.clone(),
                variable2: pair.variable2.clone(),
                coefficient,
                p_value,
                relationship: Relationship::classify(coefficient),
                significant: p_value < SIGNIFICANCE_LEVEL,
            }
        })
        .collect();

    CorrelationAnalysis {
        id: random_id(rng, "corr", &generated_at),
        generated_at,
        station_ids: station_ids.to_vec(),
        time_range,
        correlations,
        method,
    }
}
