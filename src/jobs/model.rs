// src/jobs/model.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identity of a job within one batch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        JobId(s.to_string())
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        JobId(s)
    }
}

/// A job record exactly as it appears in the job file.
///
/// ```json
/// [
///   { "job_id": "p1", "job_type": "prediction", "shell_cmd": "predict --in a.fa" },
///   { "job_id": "agg", "job_type": "aggregate", "shell_cmd": "merge",
///     "depends_on_job_ids": ["p1"] }
/// ]
/// ```
///
/// `job_type` is kept as a string here so that an unknown type surfaces as
/// [`JobrunnerError::UnknownJobType`](crate::errors::JobrunnerError) during
/// classification instead of as an opaque parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawJob {
    pub job_id: String,

    pub job_type: String,

    #[serde(alias = "shell_cmd")]
    pub command: String,

    #[serde(default)]
    pub depends_on_job_ids: Vec<String>,
}

/// The two job types the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobType {
    Prediction,
    Aggregate,
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "prediction" => Ok(JobType::Prediction),
            "aggregate" => Ok(JobType::Aggregate),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobType::Prediction => write!(f, "prediction"),
            JobType::Aggregate => write!(f, "aggregate"),
        }
    }
}

/// What a job is, plus the data that only makes sense for that kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    Prediction,
    /// Direct dependencies, in declared order. May be empty.
    Aggregate { depends_on: Vec<JobId> },
}

/// A validated, immutable job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    /// Opaque shell command line.
    pub command: String,
    pub kind: JobKind,
}

impl Job {
    pub fn prediction(id: impl Into<JobId>, command: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            command: command.into(),
            kind: JobKind::Prediction,
        }
    }

    pub fn aggregate(
        id: impl Into<JobId>,
        command: impl Into<String>,
        depends_on: Vec<JobId>,
    ) -> Self {
        Self {
            id: id.into(),
            command: command.into(),
            kind: JobKind::Aggregate { depends_on },
        }
    }

    pub fn job_type(&self) -> JobType {
        match self.kind {
            JobKind::Prediction => JobType::Prediction,
            JobKind::Aggregate { .. } => JobType::Aggregate,
        }
    }

    /// Declared dependencies; always empty for prediction jobs.
    pub fn depends_on(&self) -> &[JobId] {
        match &self.kind {
            JobKind::Prediction => &[],
            JobKind::Aggregate { depends_on } => depends_on,
        }
    }
}

/// Outcome of running one job's process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub job_id: JobId,
    pub succeeded: bool,
    /// `None` when the process could not be launched or was killed by a signal.
    pub exit_code: Option<i32>,
    /// Captured stdout on success; captured stderr (or a launch error) on failure.
    pub output: String,
}

impl JobResult {
    pub fn success(job_id: JobId, output: impl Into<String>) -> Self {
        Self {
            job_id,
            succeeded: true,
            exit_code: Some(0),
            output: output.into(),
        }
    }

    pub fn failure(job_id: JobId, exit_code: Option<i32>, output: impl Into<String>) -> Self {
        Self {
            job_id,
            succeeded: false,
            exit_code,
            output: output.into(),
        }
    }
}
