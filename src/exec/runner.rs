// src/exec/runner.rs

//! Pluggable job runner abstraction.
//!
//! The schedulers talk to a `JobRunner` instead of spawning processes
//! themselves. Production code uses [`ProcessRunner`](super::ProcessRunner);
//! tests can provide a runner that scripts outcomes without touching the OS.

use std::future::Future;
use std::pin::Pin;

use crate::jobs::{Job, JobResult};

/// Boxed future returned by [`JobRunner::run`].
pub type RunFuture<'a> = Pin<Box<dyn Future<Output = JobResult> + Send + 'a>>;

/// Trait abstracting how a single job is executed.
///
/// One runner is shared by every worker of a batch, so implementations must
/// not keep per-invocation state in `self`. Failures are part of the
/// returned [`JobResult`]; a runner never errors out of band.
pub trait JobRunner: Send + Sync {
    fn run<'a>(&'a self, job: &'a Job) -> RunFuture<'a>;
}
