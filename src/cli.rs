// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `jobrunner`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "jobrunner",
    version,
    about = "Run prediction jobs in parallel, then their aggregate jobs.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the JSON file containing the job descriptions.
    #[arg(value_name = "JOBS")]
    pub jobs: PathBuf,

    /// Number of prediction jobs to run concurrently.
    ///
    /// Overrides `[runner].worker_limit`. If neither is set, the limit is the
    /// CPU count minus the reserved CPUs.
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// CPUs to keep free when deriving the worker limit.
    #[arg(long, value_name = "N")]
    pub reserved_cpus: Option<usize>,

    /// Optional runner settings file (TOML).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `JOBRUNNER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load, validate and classify the jobs, print the plan, but don't run
    /// anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
