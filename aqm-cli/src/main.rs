//! AQM CLI - generate synthetic air quality dashboard data as JSON.

use aqm_api::{AirQualityApi, ApiConfig};
use clap::Parser;
use log::debug;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "aqm-cli",
    version,
    about = "Synthetic air quality monitoring data toolkit"
)]
struct Cli {
    /// Seed for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Skip the simulated response latency
    #[arg(long, global = true)]
    no_latency: bool,

    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: aqm_cmd::Command,
}

impl Cli {
    fn api_config(&self) -> anyhow::Result<ApiConfig> {
        let mut config = match &self.config {
            Some(path) => ApiConfig::from_json_file(path)?,
            None => ApiConfig::default(),
        };
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.no_latency {
            config = config.without_latency();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.api_config()?;
    debug!("Using config {:?}", config);
    let api = AirQualityApi::new(config)?;
    aqm_cmd::run(cli.command, &api).await
}
