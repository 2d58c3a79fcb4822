#![allow(dead_code)]

use jobrunner::jobs::{Job, JobId, RawJob};

/// Builder for a job list as it would appear in a job file.
#[derive(Debug, Default)]
pub struct JobListBuilder {
    jobs: Vec<RawJob>,
}

impl JobListBuilder {
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Add a prediction job whose command is `echo <id>`.
    pub fn prediction(mut self, id: &str) -> Self {
        self.jobs.push(raw(id, "prediction", &format!("echo {id}"), &[]));
        self
    }

    /// Add an aggregate job depending on `deps`.
    pub fn aggregate(mut self, id: &str, deps: &[&str]) -> Self {
        self.jobs.push(raw(id, "aggregate", &format!("echo {id}"), deps));
        self
    }

    /// Add a job with an arbitrary type and command.
    pub fn raw(mut self, id: &str, job_type: &str, command: &str, deps: &[&str]) -> Self {
        self.jobs.push(raw(id, job_type, command, deps));
        self
    }

    pub fn build(self) -> Vec<RawJob> {
        self.jobs
    }

    /// Serialize the list the way a job file stores it.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.jobs).expect("job records serialize")
    }
}

fn raw(id: &str, job_type: &str, command: &str, deps: &[&str]) -> RawJob {
    RawJob {
        job_id: id.to_string(),
        job_type: job_type.to_string(),
        command: command.to_string(),
        depends_on_job_ids: deps.iter().map(|d| d.to_string()).collect(),
    }
}

/// Prediction jobs `ids`, each with command `echo <id>`.
pub fn prediction_jobs(ids: &[&str]) -> Vec<Job> {
    ids.iter()
        .map(|id| Job::prediction(*id, format!("echo {id}")))
        .collect()
}

/// An aggregate job depending on `deps`.
pub fn aggregate_job(id: &str, deps: &[&str]) -> Job {
    Job::aggregate(
        id,
        format!("echo {id}"),
        deps.iter().map(|d| JobId::from(*d)).collect(),
    )
}

/// Convenience for building expected id sets.
pub fn ids(ids: &[&str]) -> std::collections::BTreeSet<JobId> {
    ids.iter().map(|id| JobId::from(*id)).collect()
}
