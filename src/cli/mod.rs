//! Command-line interface definitions.

pub mod check;
pub mod run;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Spreadwatch - multi-source price spread monitor.
#[derive(Parser, Debug)]
#[command(name = "spreadwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample prices and flag spreads (foreground)
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `spreadwatch check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Override the spread threshold in percent
    #[arg(long)]
    pub threshold: Option<Decimal>,

    /// Override the dashboard listen address
    #[arg(long)]
    pub bind: Option<String>,

    /// Do not start the dashboard
    #[arg(long)]
    pub no_dashboard: bool,

    /// Override the trade log path
    #[arg(long)]
    pub trade_log: Option<PathBuf>,
}
