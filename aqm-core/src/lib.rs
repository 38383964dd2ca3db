//! Core types for the air quality monitoring simulator.
//!
//! Holds the vocabulary every other crate speaks: pollutants and their
//! readings, weather readings, AQI bands, samples, and the static station
//! directory embedded from `fixtures/stations.csv`.

pub mod aqi;
pub mod date_range;
pub mod pollutant;
pub mod sample;
pub mod station;
pub mod weather;
