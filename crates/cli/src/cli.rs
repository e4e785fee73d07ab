//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Coldchain - simulated IoT telemetry for drug transport monitoring
#[derive(Parser, Debug)]
#[command(
    name = "coldchain",
    author,
    version,
    about = "Simulated cold-chain telemetry host",
    long_about = "A headless host for the coldchain telemetry simulation core.\n\n\
                  Generates synthetic sensor readings on a fixed cadence, evaluates \n\
                  them against safety thresholds, and logs alert transitions and \n\
                  anomaly flags. History is persisted to CSV between runs."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "COLDCHAIN_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "COLDCHAIN_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the telemetry simulation
    Run(RunArgs),

    /// Validate a configuration file without running
    Validate(ValidateArgs),

    /// Display the resolved configuration
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to a config file (JSON or TOML); omitted keys use defaults
    #[arg(short, long, env = "COLDCHAIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the sampling interval in seconds
    #[arg(long, env = "COLDCHAIN_INTERVAL")]
    pub interval: Option<f64>,

    /// Stop after this many samples (0 = unlimited)
    #[arg(long, default_value = "0", env = "COLDCHAIN_MAX_SAMPLES")]
    pub max_samples: u64,

    /// Stop after this many seconds (0 = run until interrupted)
    #[arg(long, default_value = "0")]
    pub duration: u64,

    /// RNG seed for reproducible runs
    #[arg(long, env = "COLDCHAIN_SEED")]
    pub seed: Option<u64>,

    /// Simulate sensor dropouts on temperature and humidity
    #[arg(long)]
    pub dropout: bool,

    /// Disable z-score anomaly flags
    #[arg(long)]
    pub no_anomaly: bool,

    /// Trailing window (readings) for the anomaly-count summary
    #[arg(long, default_value = "300")]
    pub window: usize,

    /// Persist history to this CSV file (restored on the next run)
    #[arg(long, env = "COLDCHAIN_HISTORY")]
    pub history_file: Option<PathBuf>,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", env = "COLDCHAIN_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the configuration file to validate
    #[arg(short, long)]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to a configuration file (defaults shown when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// History CSV to inspect
    #[arg(long)]
    pub history_file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
