// src/engine/batch.rs

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::engine::WorkerLimit;
use crate::engine::aggregate::{AggregateReport, run_aggregate_batch};
use crate::engine::prediction::{PredictionReport, run_prediction_batch};
use crate::errors::Result;
use crate::exec::JobRunner;
use crate::jobs::{RawJob, classify};

/// Result of a whole batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub prediction: PredictionReport,
    /// `None` when the batch-level gate blocked the aggregate phase.
    pub aggregate: Option<AggregateReport>,
    /// Shutdown was requested during either phase.
    pub interrupted: bool,
}

impl BatchReport {
    /// Whether the batch counts as successful for the process exit status.
    ///
    /// Aggregate outcomes never affect this.
    pub fn success(&self) -> bool {
        self.prediction.all_succeeded() && !self.interrupted
    }
}

/// Classify `jobs`, run the prediction phase, and run the aggregate phase
/// only if every prediction job succeeded.
///
/// Unknown job types and an invalid worker limit are reported before any job
/// is dispatched. A single failed prediction job blocks *all* aggregate jobs,
/// not only the ones that depend on it.
pub async fn run_batch<R>(
    jobs: &[RawJob],
    worker_limit: usize,
    runner: Arc<R>,
    shutdown: CancellationToken,
) -> Result<BatchReport>
where
    R: JobRunner + ?Sized + 'static,
{
    WorkerLimit::new(worker_limit)?;
    let plan = classify(jobs)?;

    if plan.prediction.is_empty() {
        info!("no prediction jobs need to be executed");
    } else {
        info!(
            workers = worker_limit,
            "executing prediction jobs in parallel"
        );
    }

    let prediction = run_prediction_batch(
        plan.prediction,
        worker_limit,
        Arc::clone(&runner),
        shutdown.clone(),
    )
    .await?;
    let interrupted = shutdown.is_cancelled();

    if !prediction.failed.is_empty() {
        warn!(
            failed = prediction.failed.len(),
            "prediction jobs failed; not running any aggregate jobs"
        );
        return Ok(BatchReport {
            prediction,
            aggregate: None,
            interrupted,
        });
    }

    if interrupted || !prediction.all_succeeded() {
        warn!(
            not_started = prediction.not_started.len(),
            "prediction phase did not run to completion; not running any aggregate jobs"
        );
        return Ok(BatchReport {
            prediction,
            aggregate: None,
            interrupted,
        });
    }

    info!("all prediction jobs completed successfully");

    let aggregate = if plan.aggregate.is_empty() {
        info!("there are no aggregate jobs to execute");
        AggregateReport::default()
    } else {
        run_aggregate_batch(
            &plan.aggregate,
            &prediction.completed,
            runner.as_ref(),
            &shutdown,
        )
        .await
    };

    Ok(BatchReport {
        prediction,
        aggregate: Some(aggregate),
        interrupted: shutdown.is_cancelled(),
    })
}
