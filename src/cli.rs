use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agrocast",
    version,
    about = "Agricultural sensor API with crop recommendations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Re-run interactive setup
    Init,
    /// Validate config and report database contents
    Check,
    /// Insert mock sensor and yield data into an empty database
    Seed,
    /// Print recommendations for a field as JSON
    Recommend {
        /// Field to evaluate (defaults to `defaults.field_id`)
        #[arg(long)]
        field_id: Option<String>,
    },
    /// Print a simulated 7-day weather forecast as JSON
    Forecast,
}
