// src/exec/process.rs

//! Production job runner: one shell child process per job.

use std::process::{Output, Stdio};

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::exec::runner::{JobRunner, RunFuture};
use crate::jobs::{Job, JobResult};

/// Runs a job's command through the platform shell and waits for it.
///
/// stdout and stderr are captured separately and fully drained before the
/// result is built, so nothing from one job leaks into another's output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl JobRunner for ProcessRunner {
    fn run<'a>(&'a self, job: &'a Job) -> RunFuture<'a> {
        Box::pin(run_process(job))
    }
}

async fn run_process(job: &Job) -> JobResult {
    info!(job_id = %job.id, cmd = %job.command, "starting job process");

    match spawn_and_wait(job).await {
        Ok(output) => result_from_output(job, output),
        Err(err) => {
            warn!(job_id = %job.id, error = %err, "job process could not be launched");
            JobResult::failure(job.id.clone(), None, format!("failed to launch: {err:#}"))
        }
    }
}

async fn spawn_and_wait(job: &Job) -> Result<Output> {
    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&job.command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&job.command);
        c
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    cmd.output()
        .await
        .with_context(|| format!("running process for job '{}'", job.id))
}

fn result_from_output(job: &Job, output: Output) -> JobResult {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let code = output.status.code();

    if output.status.success() {
        debug!(job_id = %job.id, stdout_bytes = stdout.len(), "job process exited successfully");
        return JobResult::success(job.id.clone(), stdout);
    }

    warn!(
        job_id = %job.id,
        exit_code = ?code,
        stdout = %stdout.trim_end(),
        stderr = %stderr.trim_end(),
        "job process failed"
    );
    JobResult::failure(job.id.clone(), code, stderr)
}
