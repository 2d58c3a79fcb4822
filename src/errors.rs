// src/errors.rs

//! Crate-wide error types.
//!
//! [`JobrunnerError`] covers everything that is fatal at batch start (bad
//! input, bad configuration). Per-job problems are [`JobFailure`]s: they are
//! recorded in the batch reports and never propagated with `?`.

use thiserror::Error;

use crate::jobs::JobId;

#[derive(Error, Debug)]
pub enum JobrunnerError {
    #[error("invalid worker limit: {0} (must be >= 1)")]
    InvalidWorkerLimit(usize),

    #[error("job '{job_id}' has unknown job_type '{job_type}' (expected \"prediction\" or \"aggregate\")")]
    UnknownJobType { job_id: String, job_type: String },

    #[error("duplicate job_id: {0}")]
    DuplicateJobId(String),

    #[error("invalid job record: {0}")]
    InvalidJob(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A problem with one job, recorded in the batch bookkeeping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobFailure {
    /// The job's process exited nonzero, was killed by a signal, or could not
    /// be launched (`exit_code` is `None` in the last two cases).
    #[error("job '{job_id}' failed (exit code {exit_code:?}): {output}")]
    JobExecutionFailure {
        job_id: JobId,
        exit_code: Option<i32>,
        output: String,
    },

    /// An aggregate job was skipped because some dependencies were not in the
    /// completed set.
    #[error("job '{job_id}' skipped; unmet dependencies: {missing:?}")]
    UnresolvedDependency { job_id: JobId, missing: Vec<JobId> },
}

impl JobFailure {
    pub fn job_id(&self) -> &JobId {
        match self {
            JobFailure::JobExecutionFailure { job_id, .. } => job_id,
            JobFailure::UnresolvedDependency { job_id, .. } => job_id,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, JobrunnerError>;
