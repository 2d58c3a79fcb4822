// src/jobs/store.rs

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::errors::{JobrunnerError, Result};
use crate::jobs::model::RawJob;

/// Load the job list from a JSON file.
///
/// This only deserializes; use [`load_and_validate`] to also check the
/// records.
pub fn load_jobs(path: impl AsRef<Path>) -> Result<Vec<RawJob>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let jobs: Vec<RawJob> = serde_json::from_str(&contents)?;

    debug!(path = %path.display(), count = jobs.len(), "loaded job records");
    Ok(jobs)
}

/// Load a job file and validate the records.
///
/// Job types and dependency references are not checked here; the former is
/// the classifier's job, and the latter are resolved at gate-check time.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Vec<RawJob>> {
    let jobs = load_jobs(path)?;
    validate_jobs(&jobs)?;
    Ok(jobs)
}

/// Check that every job has a non-empty, unique id and a non-empty command.
pub fn validate_jobs(jobs: &[RawJob]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(jobs.len());

    for (index, job) in jobs.iter().enumerate() {
        if job.job_id.trim().is_empty() {
            return Err(JobrunnerError::InvalidJob(format!(
                "job at index {index} has an empty job_id"
            )));
        }
        if job.command.trim().is_empty() {
            return Err(JobrunnerError::InvalidJob(format!(
                "job '{}' has an empty command",
                job.job_id
            )));
        }
        if !seen.insert(job.job_id.as_str()) {
            return Err(JobrunnerError::DuplicateJobId(job.job_id.clone()));
        }
    }

    Ok(())
}
