// src/engine/prediction.rs

//! Concurrent prediction phase.
//!
//! Workers pull jobs from a shared FIFO queue and send every [`JobResult`]
//! over an mpsc channel to a single consuming loop, which is the only place
//! the completed/failed sets are mutated.
//!
//! Fail-fast is cooperative: the first failing result cancels a token that
//! workers check (under the queue lock) before taking the next job. Jobs that
//! are already running are awaited and their outcomes recorded; their child
//! processes are never killed. A runner that panics counts as a failed job.

use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::engine::WorkerLimit;
use crate::errors::{JobFailure, Result};
use crate::exec::JobRunner;
use crate::jobs::{Job, JobId, JobResult};

/// Outcome of the prediction phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionReport {
    pub completed: BTreeSet<JobId>,
    pub failed: BTreeSet<JobId>,
    /// Jobs never dispatched (fail-fast or shutdown), in submission order.
    pub not_started: Vec<JobId>,
    /// Diagnostics for every failed job, in completion order.
    pub failures: Vec<JobFailure>,
}

impl PredictionReport {
    /// True when every submitted job ran and succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty() && self.not_started.is_empty()
    }

    /// Number of jobs with a recorded outcome.
    pub fn finished(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    fn record(&mut self, result: JobResult) {
        if result.succeeded {
            self.completed.insert(result.job_id);
        } else {
            self.failed.insert(result.job_id.clone());
            self.failures.push(JobFailure::JobExecutionFailure {
                job_id: result.job_id,
                exit_code: result.exit_code,
                output: result.output,
            });
        }
    }
}

type PendingJobs = Arc<Mutex<VecDeque<Job>>>;

/// Run all prediction jobs with at most `worker_limit` in flight.
///
/// `worker_limit` is validated before anything else; zero yields
/// [`InvalidWorkerLimit`](crate::errors::JobrunnerError::InvalidWorkerLimit)
/// and no job is started. Cancelling `shutdown` stops admission of new jobs
/// the same way a failure does.
pub async fn run_prediction_batch<R>(
    jobs: Vec<Job>,
    worker_limit: usize,
    runner: Arc<R>,
    shutdown: CancellationToken,
) -> Result<PredictionReport>
where
    R: JobRunner + ?Sized + 'static,
{
    let limit = WorkerLimit::new(worker_limit)?;

    if jobs.is_empty() {
        debug!("no prediction jobs; worker pool not started");
        return Ok(PredictionReport::default());
    }

    let total = jobs.len();
    let submitted: Vec<JobId> = jobs.iter().map(|j| j.id.clone()).collect();
    let worker_count = limit.get().min(total);

    info!(total, workers = worker_count, "starting prediction phase");

    let pending: PendingJobs = Arc::new(Mutex::new(jobs.into_iter().collect()));
    let fail_fast = shutdown.child_token();
    let (results_tx, mut results_rx) = mpsc::channel::<JobResult>(worker_count);

    let mut workers = Vec::with_capacity(worker_count);
    for worker in 0..worker_count {
        workers.push(tokio::spawn(worker_loop(
            worker,
            Arc::clone(&runner),
            Arc::clone(&pending),
            fail_fast.clone(),
            results_tx.clone(),
        )));
    }
    // The loop below ends once every worker has dropped its sender.
    drop(results_tx);

    let mut report = PredictionReport::default();

    while let Some(result) = results_rx.recv().await {
        let job_id = result.job_id.clone();
        let succeeded = result.succeeded;
        report.record(result);

        info!(
            job_id = %job_id,
            success = succeeded,
            done = report.finished(),
            total,
            "prediction progress"
        );

        if !succeeded && report.failed.len() == 1 {
            warn!(
                job_id = %job_id,
                "prediction job failed; no further jobs will be started"
            );
        }
        fail_fast_on(&fail_fast, succeeded);
    }

    for handle in workers {
        if let Err(err) = handle.await {
            error!(error = %err, "prediction worker panicked");
        }
    }

    report.not_started = submitted
        .into_iter()
        .filter(|id| !report.completed.contains(id) && !report.failed.contains(id))
        .collect();

    if shutdown.is_cancelled() {
        warn!(
            not_started = report.not_started.len(),
            "prediction phase interrupted by shutdown"
        );
    }

    info!(
        completed = report.completed.len(),
        failed = report.failed.len(),
        not_started = report.not_started.len(),
        "prediction phase finished"
    );

    Ok(report)
}

fn fail_fast_on(token: &CancellationToken, succeeded: bool) {
    if !succeeded {
        token.cancel();
    }
}

async fn worker_loop<R>(
    worker: usize,
    runner: Arc<R>,
    pending: PendingJobs,
    fail_fast: CancellationToken,
    results_tx: mpsc::Sender<JobResult>,
) where
    R: JobRunner + ?Sized + 'static,
{
    loop {
        let next = {
            let mut queue = pending.lock().unwrap_or_else(PoisonError::into_inner);
            if fail_fast.is_cancelled() {
                None
            } else {
                queue.pop_front()
            }
        };

        let Some(job) = next else {
            break;
        };

        debug!(worker, job_id = %job.id, "worker picked up job");
        let result = run_isolated(Arc::clone(&runner), job).await;

        // Stop this and every other worker from taking more jobs before the
        // consumer even sees the failure.
        fail_fast_on(&fail_fast, result.succeeded);

        if results_tx.send(result).await.is_err() {
            break;
        }
    }

    debug!(worker, "worker exiting");
}

/// Run one job on its own task so a panicking runner turns into a failed
/// result for that job instead of taking the worker down with it.
async fn run_isolated<R>(runner: Arc<R>, job: Job) -> JobResult
where
    R: JobRunner + ?Sized + 'static,
{
    let job_id = job.id.clone();
    match tokio::spawn(async move { runner.run(&job).await }).await {
        Ok(result) => result,
        Err(err) => {
            error!(job_id = %job_id, error = %err, "job runner panicked");
            JobResult::failure(job_id, None, format!("job runner panicked: {err}"))
        }
    }
}
