//! Fixed text catalogs the generators draw from.
//!
//! Nothing here is a global: generators receive a `&Catalogs`, so callers can
//! swap in their own templates and tests can shrink them.

use crate::health::{default_health_impacts, HealthImpact};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The attribution generator names up to five distinct sources.
pub const MIN_SOURCE_ARCHETYPES: usize = 5;
/// Each cluster carries up to two distinct characteristics.
pub const MIN_CHARACTERISTIC_TEMPLATES: usize = 2;

/// A catalog too small for the generators to honor their output ranges.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("catalog `{list}` needs at least {required} entries, found {found}")]
pub struct CatalogError {
    pub list: &'static str,
    pub required: usize,
    pub found: usize,
}

/// A pollution source the attribution generator can name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceArchetype {
    pub source_type: String,
    pub details: String,
}

/// Two variables whose correlation is reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariablePair {
    pub variable1: String,
    pub variable2: String,
}

/// Recommendation lists attached to alerts, one per severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecommendations {
    pub warning: Vec<String>,
    pub danger: Vec<String>,
    pub emergency: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalogs {
    pub characteristic_templates: Vec<String>,
    pub source_archetypes: Vec<SourceArchetype>,
    pub variable_pairs: Vec<VariablePair>,
    pub breakpoint_causes: Vec<String>,
    pub recommendations: AlertRecommendations,
    /// Population groups listed on every alert.
    pub affected_population: Vec<String>,
    pub health_impacts: Vec<HealthImpact>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn archetype(source_type: &str, details: &str) -> SourceArchetype {
    SourceArchetype {
        source_type: source_type.to_string(),
        details: details.to_string(),
    }
}

fn pair(variable1: &str, variable2: &str) -> VariablePair {
    VariablePair {
        variable1: variable1.to_string(),
        variable2: variable2.to_string(),
    }
}

impl Default for Catalogs {
    fn default() -> Self {
        Catalogs {
            characteristic_templates: strings(&[
                "Industrial zone air quality signature",
                "Commercial district pollution pattern",
                "Typical residential pollution profile",
                "Pollution pattern near transport hubs",
                "Pollutant build-up during hot weather",
                "Wind direction drives pollutant transport",
                "Pronounced day/night pollution difference",
                "Marked improvement after rainfall",
            ]),
            source_archetypes: vec![
                archetype(
                    "Traffic emissions",
                    "Mostly vehicle exhaust, including nitrogen oxides and particulates",
                ),
                archetype(
                    "Industrial activity",
                    "Emissions from nearby industrial parks, with heavy metals and VOCs",
                ),
                archetype(
                    "Coal combustion",
                    "Sulfur dioxide and particulates from power plants and winter heating",
                ),
                archetype(
                    "Construction",
                    "Site dust raising PM10 and PM2.5 levels",
                ),
                archetype(
                    "Regional transport",
                    "Pollutants carried by wind from upwind cities or industrial areas",
                ),
                archetype(
                    "Secondary formation",
                    "Ozone and other pollutants formed photochemically from primary emissions",
                ),
                archetype(
                    "Biogenic emissions",
                    "Volatile organic compounds and pollen released by vegetation",
                ),
            ],
            variable_pairs: vec![
                pair("pm25", "temperature"),
                pair("pm25", "humidity"),
                pair("pm25", "windSpeed"),
                pair("pm10", "pm25"),
                pair("o3", "temperature"),
                pair("o3", "so2"),
                pair("no2", "traffic_flow"),
                pair("so2", "industrial_activity"),
                pair("aqi", "precipitation"),
                pair("co", "traffic_congestion"),
            ],
            breakpoint_causes: strings(&[
                "Environmental policy enacted",
                "Major industrial project commissioned",
                "Traffic control measures",
                "Abrupt meteorological change",
                "Seasonal increase in pollution sources",
            ]),
            recommendations: AlertRecommendations {
                warning: strings(&[
                    "Sensitive groups should reduce outdoor activity",
                    "Wear a mask when going outside",
                    "Keep windows closed and run an air purifier",
                ]),
                danger: strings(&[
                    "Everyone should reduce prolonged outdoor exertion",
                    "Wear an N95 mask outdoors",
                    "Keep windows closed and run an air purifier",
                    "Schools should move activities indoors",
                ]),
                emergency: strings(&[
                    "Avoid all outdoor activity",
                    "Wear an N95 mask if going outside is unavoidable",
                    "Seal windows and run air purifiers continuously",
                    "Suspend outdoor work and school activities",
                ]),
            },
            affected_population: strings(&[
                "Children",
                "Elderly",
                "People with respiratory conditions",
            ]),
            health_impacts: default_health_impacts(),
        }
    }
}

fn require(list: &'static str, found: usize, required: usize) -> Result<(), CatalogError> {
    if found < required {
        return Err(CatalogError {
            list,
            required,
            found,
        });
    }
    Ok(())
}

impl Catalogs {
    /// Check every list is large enough for the generators that draw from it.
    pub fn validate(&self) -> Result<(), CatalogError> {
        require(
            "characteristic_templates",
            self.characteristic_templates.len(),
            MIN_CHARACTERISTIC_TEMPLATES,
        )?;
        require(
            "source_archetypes",
            self.source_archetypes.len(),
            MIN_SOURCE_ARCHETYPES,
        )?;
        require("variable_pairs", self.variable_pairs.len(), 1)?;
        require("breakpoint_causes", self.breakpoint_causes.len(), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogError, Catalogs};

    #[test]
    fn test_default_catalog_sizes() {
        let catalogs = Catalogs::default();
        assert_eq!(catalogs.characteristic_templates.len(), 8);
        assert_eq!(catalogs.source_archetypes.len(), 7);
        assert_eq!(catalogs.variable_pairs.len(), 10);
        assert_eq!(catalogs.breakpoint_causes.len(), 5);
        assert!(!catalogs.health_impacts.is_empty());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let catalogs: Catalogs =
            serde_json::from_str(r#"{"breakpoint_causes": ["Holiday traffic ban"]}"#).unwrap();
        assert_eq!(catalogs.breakpoint_causes, vec!["Holiday traffic ban"]);
        assert_eq!(catalogs.source_archetypes.len(), 7);
    }

    #[test]
    fn test_default_catalog_is_valid() {
        assert_eq!(Catalogs::default().validate(), Ok(()));
    }

    #[test]
    fn test_short_lists_are_rejected() {
        let mut catalogs = Catalogs::default();
        catalogs.source_archetypes.truncate(4);
        assert_eq!(
            catalogs.validate(),
            Err(CatalogError {
                list: "source_archetypes",
                required: 5,
                found: 4,
            })
        );

        let mut catalogs = Catalogs::default();
        catalogs.characteristic_templates.truncate(1);
        assert_eq!(catalogs.validate().unwrap_err().list, "characteristic_templates");

        let mut catalogs = Catalogs::default();
        catalogs.variable_pairs.clear();
        assert_eq!(catalogs.validate().unwrap_err().list, "variable_pairs");
    }
}
