//! Health-impact guidance keyed by pollutant, concentration and population group.

use crate::ParseEnumError;
use aqm_core::pollutant::Pollutant;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PopulationGroup {
    General,
    Children,
    Elderly,
    Respiratory,
    Cardiovascular,
}

impl FromStr for PopulationGroup {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(PopulationGroup::General),
            "children" => Ok(PopulationGroup::Children),
            "elderly" => Ok(PopulationGroup::Elderly),
            "respiratory" => Ok(PopulationGroup::Respiratory),
            "cardiovascular" => Ok(PopulationGroup::Cardiovascular),
            _ => Err(ParseEnumError::new("population group", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

/// Inclusive concentration bounds, in the pollutant's own unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationRange {
    pub min: f64,
    pub max: f64,
}

impl ConcentrationRange {
    pub fn contains(&self, concentration: f64) -> bool {
        self.min <= concentration && concentration <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthImpact {
    pub pollutant: Pollutant,
    pub concentration_range: ConcentrationRange,
    pub population_group: PopulationGroup,
    pub short_term_effects: Vec<String>,
    pub long_term_effects: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk_level: RiskLevel,
}

/// Entries for `pollutant` whose range contains `concentration` and whose
/// group is `group` or `General`.
pub fn find_health_impacts(
    impacts: &[HealthImpact],
    pollutant: Pollutant,
    concentration: f64,
    group: PopulationGroup,
) -> Vec<HealthImpact> {
    impacts
        .iter()
        .filter(|impact| {
            impact.pollutant == pollutant
                && impact.concentration_range.contains(concentration)
                && (impact.population_group == group
                    || impact.population_group == PopulationGroup::General)
        })
        .cloned()
        .collect()
}

fn impact(
    pollutant: Pollutant,
    (min, max): (f64, f64),
    population_group: PopulationGroup,
    short_term: &[&str],
    long_term: &[&str],
    recommendations: &[&str],
    risk_level: RiskLevel,
) -> HealthImpact {
    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }
    HealthImpact {
        pollutant,
        concentration_range: ConcentrationRange { min, max },
        population_group,
        short_term_effects: owned(short_term),
        long_term_effects: owned(long_term),
        recommendations: owned(recommendations),
        risk_level,
    }
}

/// Built-in health guidance table.
pub fn default_health_impacts() -> Vec<HealthImpact> {
    use PopulationGroup::{General, Respiratory};
    vec![
        impact(
            Pollutant::Pm25,
            (0.0, 35.0),
            General,
            &["Usually no noticeable effect"],
            &["Long-term exposure may slightly raise respiratory disease risk"],
            &["Normal activity"],
            RiskLevel::Low,
        ),
        impact(
            Pollutant::Pm25,
            (35.0, 150.0),
            General,
            &["Possible mild cough", "Eye irritation"],
            &[
                "Higher respiratory disease risk",
                "Cardiovascular health may be affected",
            ],
            &["Limit prolonged outdoor activity", "Keep windows closed"],
            RiskLevel::Medium,
        ),
        impact(
            Pollutant::Pm25,
            (150.0, 999.0),
            General,
            &["Coughing", "Shortness of breath", "Eye irritation"],
            &[
                "Significantly higher respiratory disease risk",
                "Higher cardiovascular disease risk",
            ],
            &[
                "Avoid outdoor activity",
                "Wear a mask",
                "Run an air purifier",
            ],
            RiskLevel::High,
        ),
        impact(
            Pollutant::Pm25,
            (35.0, 150.0),
            Respiratory,
            &["Aggravated asthma symptoms", "Breathing discomfort"],
            &[
                "Reduced lung function",
                "Worsening chronic respiratory disease",
            ],
            &[
                "Avoid outdoor activity",
                "Carry asthma medication",
                "Wear an N95 mask",
            ],
            RiskLevel::High,
        ),
        impact(
            Pollutant::O3,
            (0.0, 70.0),
            General,
            &["Usually no noticeable effect"],
            &["May slightly affect lung health"],
            &["Normal activity"],
            RiskLevel::Low,
        ),
        impact(
            Pollutant::O3,
            (70.0, 999.0),
            General,
            &["Coughing", "Chest pain", "Shortness of breath"],
            &["Lung function damage", "Higher respiratory infection risk"],
            &[
                "Avoid strenuous outdoor activity",
                "Especially during hot afternoons",
            ],
            RiskLevel::Medium,
        ),
    ]
}
