#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the behaviour intelligence engine.
//!
//! Each subcommand prints one analysis view. Running without a subcommand
//! opens an interactive menu over the same views.
//!
//! Uses `indicatif-log-bridge` (via [`behavior_intel_cli_utils::init_logger`])
//! so log lines and the forecast spinner never fight for the terminal.

mod commands;
mod config;
mod interactive;
mod render;

use std::path::PathBuf;

use behavior_intel_analytics::session::AnalysisSession;
use behavior_intel_analytics_models::{AnomalyParams, ForecastParams};
use behavior_intel_ingest::DataPaths;
use clap::{Parser, Subcommand};

use crate::commands::Runner;
use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "behavior_intel",
    about = "Risk tiers, anomaly views and load forecasts over identity update behaviour"
)]
struct Cli {
    /// Directory holding the input CSV tables (overrides config and
    /// `BEHAVIOR_INTEL_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Path to a TOML config file (defaults to `behavior_intel.toml` if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print view results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// National headline numbers
    Summary,
    /// Monthly volume totals, ratio trend and biometric growth
    Trends,
    /// Anomaly counts and the filtered anomaly table, highest ratio first
    Anomalies {
        /// Month to show (`YYYY-MM`), or "All"
        #[arg(long)]
        month: Option<String>,
        /// State to show, or "All"
        #[arg(long)]
        state: Option<String>,
    },
    /// State risk hotspots with coordinates and the top risky states
    Hotspots,
    /// Riskiest districts with their tiers
    Ranking,
    /// Recommended action per district
    Recommendations,
    /// Forecast the next months and interpret the ratio trend
    Forecast {
        /// Months to forecast (1-12). Defaults to `default_horizon` from config.
        #[arg(long)]
        horizon: Option<i64>,
    },
    /// Write the anomaly table and tiered district table as CSV
    Export {
        /// Output directory (created if missing)
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = behavior_intel_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = Config::resolve(cli.config.as_deref(), cli.data_dir)?;
    let session = AnalysisSession::load(&DataPaths::new(&config.data_dir))?
        .with_default_horizon(config.horizon()?);

    let runner = Runner {
        session: &session,
        limits: config.ranking_params(),
        multi: &multi,
        json: cli.json,
    };

    let Some(command) = cli.command else {
        println!("Behaviour Intelligence");
        return interactive::run(&runner);
    };

    match command {
        Commands::Summary => runner.summary(),
        Commands::Trends => runner.trends(),
        Commands::Anomalies { month, state } => runner.anomalies(&AnomalyParams { month, state }),
        Commands::Hotspots => runner.hotspots(),
        Commands::Ranking => runner.ranking(),
        Commands::Recommendations => runner.recommendations(),
        Commands::Forecast { horizon } => runner.forecast(&ForecastParams { horizon }),
        Commands::Export { out } => runner.export(&out),
    }
}
