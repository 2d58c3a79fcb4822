// src/config/model.rs

use serde::Deserialize;

/// Top-level settings as read from a TOML file.
///
/// ```toml
/// [runner]
/// worker_limit = 8
/// reserved_cpus = 2
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub runner: RunnerSection,
}

/// `[runner]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerSection {
    /// Fixed number of concurrent prediction workers.
    ///
    /// If `None`, the limit is derived from the CPU count minus
    /// `reserved_cpus`.
    #[serde(default)]
    pub worker_limit: Option<usize>,

    /// CPUs to keep free when deriving the worker limit.
    #[serde(default)]
    pub reserved_cpus: usize,
}

/// Validated settings.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// [`ConfigFile::default`].
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub runner: RunnerSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(runner: RunnerSection) -> Self {
        Self { runner }
    }

    /// Resolve the effective worker limit.
    ///
    /// Priority: `cli_workers`, then `[runner].worker_limit`, then the number
    /// of available CPUs minus the reservation (`cli_reserved` overriding
    /// `[runner].reserved_cpus`). The derived value may be zero; rejecting it
    /// is left to the engine.
    pub fn resolve_worker_limit(
        &self,
        cli_workers: Option<usize>,
        cli_reserved: Option<usize>,
    ) -> usize {
        if let Some(n) = cli_workers.or(self.runner.worker_limit) {
            return n;
        }

        let reserved = cli_reserved.unwrap_or(self.runner.reserved_cpus);
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        cpus.saturating_sub(reserved)
    }
}
