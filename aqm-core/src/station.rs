use anyhow::{anyhow, Context};
use aqm_utils::dates::parse_date;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use log::debug;
use serde::{Deserialize, Serialize};

/// Embedded CSV data for the monitoring station directory.
pub static STATIONS_CSV: &str = include_str!("../../fixtures/stations.csv");

/// Expected number of columns in a station CSV row.
pub const CSV_ROW_LENGTH: usize = 10;

/// Where a monitoring station sits.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct StationLocation {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    pub address: String,
    pub district: String,
    pub city: String,
}

/// Represents an air quality monitoring station.
///
/// Stations are reference data: the directory is parsed once and never
/// mutated afterwards.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Station identifier (e.g., "station-001")
    pub id: String,
    /// Human-readable name of the station
    pub name: String,
    pub location: StationLocation,
    pub active: bool,
    pub installation_date: NaiveDate,
    pub last_maintenance: NaiveDate,
}

fn field<'r>(record: &'r StringRecord, idx: usize, name: &str) -> anyhow::Result<&'r str> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| anyhow!("missing `{name}` column"))
}

fn parse_f64(record: &StringRecord, idx: usize, name: &str) -> anyhow::Result<f64> {
    let raw = field(record, idx, name)?;
    raw.parse::<f64>()
        .with_context(|| format!("`{name}` is not a number: {raw}"))
}

fn parse_bool(ess: &str) -> bool {
    matches!(
        ess.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

impl TryFrom<&StringRecord> for Station {
    type Error = anyhow::Error;

    fn try_from(record: &StringRecord) -> Result<Self, Self::Error> {
        if record.len() != CSV_ROW_LENGTH {
            return Err(anyhow!(
                "expected {} columns, found {}",
                CSV_ROW_LENGTH,
                record.len()
            ));
        }
        Ok(Station {
            id: field(record, 0, "station_id")?.to_string(),
            name: field(record, 1, "name")?.to_string(),
            location: StationLocation {
                latitude: parse_f64(record, 2, "latitude")?,
                longitude: parse_f64(record, 3, "longitude")?,
                address: field(record, 4, "address")?.to_string(),
                district: field(record, 5, "district")?.to_string(),
                city: field(record, 6, "city")?.to_string(),
            },
            active: parse_bool(field(record, 7, "active")?),
            installation_date: parse_date(field(record, 8, "installation_date")?)?,
            last_maintenance: parse_date(field(record, 9, "last_maintenance")?)?,
        })
    }
}

impl Station {
    /// Parse a CSV string of station data into a vector of Stations.
    ///
    /// Expected CSV columns: station_id, name, latitude, longitude, address,
    /// district, city, active, installation_date, last_maintenance
    pub fn parse_station_csv(csv_object: &str) -> anyhow::Result<Vec<Station>> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .from_reader(csv_object.as_bytes());
        let mut station_list: Vec<Station> = Vec::new();
        for (line, row) in rdr.records().enumerate() {
            let record = row?;
            let station = Station::try_from(&record)
                .with_context(|| format!("station row {}", line + 1))?;
            station_list.push(station);
        }
        Ok(station_list)
    }
}

/// Read-only directory of every known monitoring station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationDirectory {
    stations: Vec<Station>,
}

impl StationDirectory {
    pub fn new(stations: Vec<Station>) -> Self {
        StationDirectory { stations }
    }

    /// Directory built from the embedded station fixture.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_csv(STATIONS_CSV)
    }

    /// Directory built from a custom CSV string.
    pub fn from_csv(csv_object: &str) -> anyhow::Result<Self> {
        let stations = Station::parse_station_csv(csv_object)?;
        debug!("Loaded {} monitoring stations", stations.len());
        Ok(StationDirectory::new(stations))
    }

    pub fn all(&self) -> &[Station] {
        &self.stations
    }

    pub fn get(&self, station_id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == station_id)
    }

    pub fn contains(&self, station_id: &str) -> bool {
        self.get(station_id).is_some()
    }

    pub fn ids(&self) -> Vec<String> {
        self.stations.iter().map(|s| s.id.clone()).collect()
    }

    /// District of a station, if the station is known.
    pub fn district_of(&self, station_id: &str) -> Option<&str> {
        self.get(station_id).map(|s| s.location.district.as_str())
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "station_id,name,latitude,longitude,address,district,city,active,installation_date,last_maintenance\n";

    #[test]
    fn test_parse_station_csv() {
        let csv_data = format!(
            "{HEADER}\
s-1,North Station,39.92,116.44,Main Road,Chaoyang,Beijing,true,2020-01-15,2023-03-22
s-2,South Station,22.53,113.93,Tech Park,Nanshan,Shenzhen,false,2019-08-25,2023-03-15
"
        );
        let stations = Station::parse_station_csv(&csv_data).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, "s-1");
        assert_eq!(stations[0].name, "North Station");
        assert!((stations[0].location.latitude - 39.92).abs() < f64::EPSILON);
        assert_eq!(stations[0].location.district, "Chaoyang");
        assert!(stations[0].active);
        assert!(!stations[1].active);
        assert_eq!(
            stations[1].installation_date,
            NaiveDate::from_ymd_opt(2019, 8, 25).unwrap()
        );
    }

    #[test]
    fn test_parse_empty_csv() {
        let stations = Station::parse_station_csv(HEADER).unwrap();
        assert_eq!(stations.len(), 0);
    }

    #[test]
    fn test_parse_rejects_bad_latitude() {
        let csv_data = format!(
            "{HEADER}s-1,North,north,116.44,Main Road,Chaoyang,Beijing,true,2020-01-15,2023-03-22\n"
        );
        let err = Station::parse_station_csv(&csv_data).unwrap_err();
        assert!(format!("{err:#}").contains("latitude"));
    }

    #[test]
    fn test_embedded_directory() {
        let directory = StationDirectory::embedded().unwrap();
        assert_eq!(directory.len(), 5);
        assert!(directory.contains("station-001"));
        assert!(!directory.contains("nonexistent-id"));
        assert_eq!(directory.district_of("station-005"), Some("Nanshan"));
        assert_eq!(directory.ids()[0], "station-001");
        assert!(directory.all().iter().all(|s| s.active));
    }

    #[test]
    fn test_station_serialized_shape() {
        let directory = StationDirectory::embedded().unwrap();
        let value = serde_json::to_value(directory.get("station-002").unwrap()).unwrap();
        assert_eq!(value["installationDate"], "2019-10-10");
        assert_eq!(value["location"]["city"], "Beijing");
    }
}
