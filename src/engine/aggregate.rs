// src/engine/aggregate.rs

//! Sequential aggregate phase.

use std::collections::BTreeSet;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::errors::JobFailure;
use crate::exec::JobRunner;
use crate::jobs::{Job, JobId, JobResult};

/// What happened to a single aggregate job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateOutcome {
    /// All dependencies were completed, so the job ran (successfully or not).
    Ran(JobResult),
    /// At least one dependency was not completed; always an
    /// [`JobFailure::UnresolvedDependency`].
    Skipped(JobFailure),
    /// Shutdown was requested before the job's turn came.
    NotStarted(JobId),
}

impl AggregateOutcome {
    pub fn job_id(&self) -> &JobId {
        match self {
            AggregateOutcome::Ran(result) => &result.job_id,
            AggregateOutcome::Skipped(failure) => failure.job_id(),
            AggregateOutcome::NotStarted(job_id) => job_id,
        }
    }
}

/// Outcomes of the aggregate phase, one per aggregate job, in job order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    pub outcomes: Vec<AggregateOutcome>,
}

impl AggregateReport {
    pub fn ran(&self) -> impl Iterator<Item = &JobResult> {
        self.outcomes.iter().filter_map(|o| match o {
            AggregateOutcome::Ran(result) => Some(result),
            _ => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = &JobFailure> {
        self.outcomes.iter().filter_map(|o| match o {
            AggregateOutcome::Skipped(failure) => Some(failure),
            _ => None,
        })
    }

    pub fn not_started(&self) -> impl Iterator<Item = &JobId> {
        self.outcomes.iter().filter_map(|o| match o {
            AggregateOutcome::NotStarted(job_id) => Some(job_id),
            _ => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = &JobResult> {
        self.ran().filter(|r| !r.succeeded)
    }
}

/// Dependencies of `job` that are not in `completed`, in declared order.
pub fn unmet_dependencies(job: &Job, completed: &BTreeSet<JobId>) -> Vec<JobId> {
    job.depends_on()
        .iter()
        .filter(|dep| !completed.contains(*dep))
        .cloned()
        .collect()
}

/// Run aggregate jobs one after another.
///
/// Only direct dependencies are checked. A failing aggregate job is recorded
/// and the next one still runs. Once `shutdown` is cancelled, the running job
/// is awaited and every later job is recorded as
/// [`AggregateOutcome::NotStarted`].
pub async fn run_aggregate_batch<R>(
    jobs: &[Job],
    completed: &BTreeSet<JobId>,
    runner: &R,
    shutdown: &CancellationToken,
) -> AggregateReport
where
    R: JobRunner + ?Sized,
{
    let mut report = AggregateReport::default();

    for job in jobs {
        if shutdown.is_cancelled() {
            report
                .outcomes
                .push(AggregateOutcome::NotStarted(job.id.clone()));
            continue;
        }

        let missing = unmet_dependencies(job, completed);

        if !missing.is_empty() {
            warn!(
                job_id = %job.id,
                ?missing,
                "not all dependencies completed; skipping aggregate job"
            );
            report
                .outcomes
                .push(AggregateOutcome::Skipped(JobFailure::UnresolvedDependency {
                    job_id: job.id.clone(),
                    missing,
                }));
            continue;
        }

        info!(job_id = %job.id, "running aggregate job");
        let result = runner.run(job).await;

        if result.succeeded {
            info!(job_id = %job.id, "aggregate job done");
        } else {
            warn!(
                job_id = %job.id,
                exit_code = ?result.exit_code,
                "aggregate job failed; continuing with remaining aggregate jobs"
            );
        }

        report.outcomes.push(AggregateOutcome::Ran(result));
    }

    let not_started = report.not_started().count();
    if not_started > 0 {
        warn!(not_started, "aggregate phase interrupted by shutdown");
    }

    report
}
