//! Command implementations for the AQM CLI.
//!
//! Every subcommand calls one facade method and prints the response
//! envelope as pretty JSON on stdout.

use aqm_api::{AirQualityApi, ApiResponse};
use aqm_core::pollutant::Pollutant;
use aqm_data::{
    analytics::{correlation::CorrelationMethod, trend::TrendInterval},
    health::PopulationGroup,
};
use clap::Subcommand;
use log::info;
use serde::Serialize;
use std::io::Write;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List every monitoring station
    Stations,

    /// Show one monitoring station
    Station {
        station_id: String,
    },

    /// Current readings for every station
    Realtime {
        /// Only this station
        #[arg(long)]
        station: Option<String>,
    },

    /// Hourly readings for the past 24 hours
    Past {
        station_id: String,
    },

    /// Four readings a day over a date range
    History {
        station_id: String,
        #[arg(long, value_name = "YYYY-MM-DD")]
        start_date: String,
        #[arg(long, value_name = "YYYY-MM-DD")]
        end_date: String,
    },

    /// 24-hour AQI forecast
    Forecast {
        station_id: String,
    },

    /// Multi-day hourly AQI prediction
    Predict {
        station_id: String,
        /// Days to predict (defaults to the configured horizon)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Alerts raised by the current readings
    Alerts,

    /// Health guidance for a pollutant concentration
    Health {
        pollutant: Pollutant,
        concentration: f64,
        #[arg(long, default_value = "general")]
        group: PopulationGroup,
    },

    /// Group stations into clusters
    Clusters {
        /// Stations to cluster (defaults to every station)
        #[arg(long = "station", value_name = "STATION_ID")]
        stations: Vec<String>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        start_date: String,
        #[arg(long, value_name = "YYYY-MM-DD")]
        end_date: String,
    },

    /// Correlations between pollutant and weather variables
    Correlations {
        #[arg(long = "station", value_name = "STATION_ID")]
        stations: Vec<String>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        start_date: String,
        #[arg(long, value_name = "YYYY-MM-DD")]
        end_date: String,
        #[arg(long, default_value = "pearson")]
        method: CorrelationMethod,
    },

    /// Attribute pollution at a station to likely sources
    Attribution {
        station_id: String,
        /// RFC 3339 instant or YYYY-MM-DD
        #[arg(long)]
        timestamp: String,
    },

    /// Long-term trend decomposition for one pollutant
    Trend {
        station_id: String,
        pollutant: Pollutant,
        #[arg(long, value_name = "YYYY-MM-DD")]
        start_date: String,
        #[arg(long, value_name = "YYYY-MM-DD")]
        end_date: String,
        #[arg(long, default_value = "day")]
        interval: TrendInterval,
    },
}

fn write_json<T: Serialize, W: Write>(out: &mut W, response: &ApiResponse<T>) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, response)?;
    writeln!(out)?;
    Ok(())
}

fn all_if_empty(api: &AirQualityApi, stations: Vec<String>) -> Vec<String> {
    if stations.is_empty() {
        api.directory().ids()
    } else {
        stations
    }
}

/// Run `command` against `api`, writing the envelope to `out`.
pub async fn run_to<W: Write>(command: Command, api: &AirQualityApi, out: &mut W) -> anyhow::Result<()> {
    info!("Running {:?}", command);
    match command {
        Command::Stations => write_json(out, &api.get_all_stations().await),
        Command::Station { station_id } => write_json(out, &api.get_station(&station_id).await),
        Command::Realtime { station: Some(station_id) } => {
            write_json(out, &api.get_station_realtime(&station_id).await)
        }
        Command::Realtime { station: None } => {
            write_json(out, &api.get_realtime_air_quality().await)
        }
        Command::Past { station_id } => {
            write_json(out, &api.get_station_past_window(&station_id).await)
        }
        Command::History {
            station_id,
            start_date,
            end_date,
        } => write_json(
            out,
            &api.get_historical_data(&station_id, &start_date, &end_date).await,
        ),
        Command::Forecast { station_id } => {
            write_json(out, &api.get_station_forecast(&station_id).await)
        }
        Command::Predict { station_id, days } => {
            write_json(out, &api.get_advanced_prediction(&station_id, days).await)
        }
        Command::Alerts => write_json(out, &api.get_current_alerts().await),
        Command::Health {
            pollutant,
            concentration,
            group,
        } => write_json(
            out,
            &api.get_health_impacts(pollutant, concentration, group).await,
        ),
        Command::Clusters {
            stations,
            start_date,
            end_date,
        } => {
            let stations = all_if_empty(api, stations);
            write_json(
                out,
                &api.get_cluster_analysis(&stations, &start_date, &end_date).await,
            )
        }
        Command::Correlations {
            stations,
            start_date,
            end_date,
            method,
        } => {
            let stations = all_if_empty(api, stations);
            write_json(
                out,
                &api.get_correlation_analysis(&stations, &start_date, &end_date, method)
                    .await,
            )
        }
        Command::Attribution {
            station_id,
            timestamp,
        } => write_json(
            out,
            &api.get_source_attribution(&station_id, &timestamp).await,
        ),
        Command::Trend {
            station_id,
            pollutant,
            start_date,
            end_date,
            interval,
        } => write_json(
            out,
            &api.get_trend_analysis(&station_id, pollutant, &start_date, &end_date, interval)
                .await,
        ),
    }
}

/// Run `command` against `api`, printing the envelope to stdout.
pub async fn run(command: Command, api: &AirQualityApi) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_to(command, api, &mut out).await
}
