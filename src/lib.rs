// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod jobs;
pub mod logging;

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::engine::{AggregateOutcome, BatchReport, WorkerLimit, run_batch};
use crate::exec::ProcessRunner;
use crate::jobs::{JobKind, JobPlan, classify};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings + job file loading
/// - worker limit resolution
/// - the batch engine with the real process runner
/// - Ctrl-C handling
///
/// Returns whether the batch succeeded, which `main` maps to the exit status.
pub async fn run(args: CliArgs) -> Result<bool> {
    let cfg = match args.config {
        Some(ref path) => config::load_and_validate(path)?,
        None => ConfigFile::default(),
    };

    let raw_jobs = jobs::load_and_validate(&args.jobs)?;
    let worker_limit = cfg.resolve_worker_limit(args.workers, args.reserved_cpus);

    if args.dry_run {
        WorkerLimit::new(worker_limit)?;
        let plan = classify(&raw_jobs)?;
        print_dry_run(&plan, worker_limit);
        return Ok(true);
    }

    let shutdown = CancellationToken::new();
    spawn_ctrl_c_handler(shutdown.clone());

    let runner = Arc::new(ProcessRunner::new());
    let report = run_batch(&raw_jobs, worker_limit, runner, shutdown).await?;

    print_aggregate_output(&report);
    log_summary(&report);

    Ok(report.success())
}

/// First Ctrl-C stops new jobs from starting in either phase; a second one
/// exits immediately.
fn spawn_ctrl_c_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        warn!("Ctrl+C received; waiting for running jobs (press again to exit now)");
        shutdown.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}

fn print_aggregate_output(report: &BatchReport) {
    let Some(ref aggregate) = report.aggregate else {
        return;
    };

    for result in aggregate.ran().filter(|r| r.succeeded) {
        if !result.output.is_empty() {
            print!("{}", result.output);
        }
    }
}

fn log_summary(report: &BatchReport) {
    let prediction = &report.prediction;

    for failure in &prediction.failures {
        warn!(job_id = %failure.job_id(), "{failure}");
    }

    match report.aggregate {
        Some(ref aggregate) => {
            let skipped = aggregate.skipped().count();
            let failed = aggregate.failed().count();
            info!(
                ran = aggregate.ran().count(),
                failed,
                skipped,
                not_started = aggregate.not_started().count(),
                "aggregate phase finished"
            );
            for outcome in &aggregate.outcomes {
                if let AggregateOutcome::Skipped(failure) = outcome {
                    debug!(job_id = %outcome.job_id(), "{failure}");
                }
            }
        }
        None => {
            info!("aggregate phase did not run");
        }
    }

    if report.success() {
        info!(
            completed = prediction.completed.len(),
            "batch finished successfully"
        );
    } else {
        warn!(
            failed = prediction.failed.len(),
            not_started = prediction.not_started.len(),
            interrupted = report.interrupted,
            "batch failed"
        );
    }
}

/// Simple dry-run output: print the classified jobs and the worker limit.
fn print_dry_run(plan: &JobPlan, worker_limit: usize) {
    println!("jobrunner dry-run");
    println!("  worker_limit = {worker_limit}");
    println!();

    println!("prediction jobs ({}):", plan.prediction.len());
    for job in &plan.prediction {
        println!("  - {} [{}]", job.id, job.job_type());
        println!("      cmd: {}", job.command);
    }

    println!("aggregate jobs ({}):", plan.aggregate.len());
    for job in &plan.aggregate {
        println!("  - {} [{}]", job.id, job.job_type());
        println!("      cmd: {}", job.command);
        if let JobKind::Aggregate { ref depends_on } = job.kind {
            if !depends_on.is_empty() {
                let deps: Vec<&str> = depends_on.iter().map(|d| d.as_str()).collect();
                println!("      depends_on: {deps:?}");
            }
        }
    }

    debug!("dry-run complete (no execution)");
}
