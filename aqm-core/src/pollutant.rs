use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A monitored air pollutant.
///
/// Variant order is the catalog order used to break ties when picking the
/// dominant pollutant of a sample.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    Pm10,
    O3,
    No2,
    So2,
    Co,
}

/// Returned when a pollutant key is not one of `pm25|pm10|o3|no2|so2|co`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pollutant `{0}` (expected one of pm25, pm10, o3, no2, so2, co)")]
pub struct UnknownPollutant(pub String);

impl Pollutant {
    /// Every pollutant in catalog order.
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::O3,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
    ];

    /// Wire key, e.g. `"pm25"`.
    pub fn key(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::O3 => "o3",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
        }
    }

    /// Human-readable label used in alert messages.
    pub fn label(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::O3 => "O₃",
            Pollutant::No2 => "NO₂",
            Pollutant::So2 => "SO₂",
            Pollutant::Co => "CO",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Pollutant::Pm25 | Pollutant::Pm10 => "μg/m³",
            Pollutant::O3 | Pollutant::No2 | Pollutant::So2 => "ppb",
            Pollutant::Co => "ppm",
        }
    }

    /// Reference concentration a reading is divided by before pollutants are
    /// compared against each other.
    pub fn reference_standard(self) -> f64 {
        match self {
            Pollutant::Pm25 => 35.0,
            Pollutant::Pm10 => 70.0,
            Pollutant::O3 => 70.0,
            Pollutant::No2 => 40.0,
            Pollutant::So2 => 20.0,
            Pollutant::Co => 4.0,
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Pollutant {
    type Err = UnknownPollutant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pm25" | "pm2.5" => Ok(Pollutant::Pm25),
            "pm10" => Ok(Pollutant::Pm10),
            "o3" => Ok(Pollutant::O3),
            "no2" => Ok(Pollutant::No2),
            "so2" => Ok(Pollutant::So2),
            "co" => Ok(Pollutant::Co),
            _ => Err(UnknownPollutant(s.to_string())),
        }
    }
}

/// Concentrations for every pollutant of one observation.
#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PollutantReadings {
    pub pm25: f64,
    pub pm10: f64,
    pub o3: f64,
    pub no2: f64,
    pub so2: f64,
    pub co: f64,
}

impl PollutantReadings {
    pub fn get(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::O3 => self.o3,
            Pollutant::No2 => self.no2,
            Pollutant::So2 => self.so2,
            Pollutant::Co => self.co,
        }
    }

    pub fn set(&mut self, pollutant: Pollutant, value: f64) {
        let slot = match pollutant {
            Pollutant::Pm25 => &mut self.pm25,
            Pollutant::Pm10 => &mut self.pm10,
            Pollutant::O3 => &mut self.o3,
            Pollutant::No2 => &mut self.no2,
            Pollutant::So2 => &mut self.so2,
            Pollutant::Co => &mut self.co,
        };
        *slot = value;
    }

    /// Reading divided by the pollutant's reference standard.
    pub fn normalized(&self, pollutant: Pollutant) -> f64 {
        self.get(pollutant) / pollutant.reference_standard()
    }

    /// Pollutant with the highest normalized reading. Ties go to the earlier
    /// pollutant in catalog order.
    pub fn dominant(&self) -> Pollutant {
        let mut best = Pollutant::Pm25;
        let mut best_ratio = self.normalized(best);
        for pollutant in &Pollutant::ALL[1..] {
            let ratio = self.normalized(*pollutant);
            if ratio > best_ratio {
                best = *pollutant;
                best_ratio = ratio;
            }
        }
        best
    }
}
