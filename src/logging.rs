// src/logging.rs

//! Logging setup for `jobrunner` using `tracing` + `tracing-subscriber`.
//!
//! Filter selection:
//! 1. `--log-level` CLI flag applies one level to everything.
//! 2. Otherwise `JOBRUNNER_LOG` is read as an `EnvFilter` directive string,
//!    so both `debug` and `jobrunner::engine=trace,info` work.
//! 3. Otherwise `info`.
//!
//! Logs go to stderr. stdout carries aggregate job output and the dry-run
//! plan only.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "JOBRUNNER_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV_VAR).ok().as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing tracing subscriber: {e}"))
}

/// Pick the filter from the CLI level or the env directive string.
///
/// An unparsable env value falls back to `info` rather than failing startup.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level_directive(level));
    }

    env_value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
