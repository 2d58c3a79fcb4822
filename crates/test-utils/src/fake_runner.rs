use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use jobrunner::exec::{JobRunner, RunFuture};
use jobrunner::jobs::{Job, JobId, JobResult};

/// Scripted behaviour for one job.
#[derive(Debug, Clone, Copy)]
pub struct FakeOutcome {
    pub succeed: bool,
    pub panic: bool,
    pub delay: Duration,
}

impl FakeOutcome {
    pub fn ok() -> Self {
        Self {
            succeed: true,
            panic: false,
            delay: Duration::ZERO,
        }
    }

    pub fn fail() -> Self {
        Self {
            succeed: false,
            panic: false,
            delay: Duration::ZERO,
        }
    }

    /// Panic inside the runner instead of returning a result.
    pub fn panic() -> Self {
        Self {
            succeed: false,
            panic: true,
            delay: Duration::ZERO,
        }
    }

    pub fn after_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }
}

/// A fake runner that:
/// - sleeps for the scripted delay instead of spawning a process
/// - records which jobs were started, in start order
/// - tracks the peak number of jobs running at the same time
///
/// Jobs without a script succeed immediately with output `"<id> ok"`.
#[derive(Debug, Default)]
pub struct FakeRunner {
    script: HashMap<JobId, FakeOutcome>,
    started: Mutex<Vec<JobId>>,
    running: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: &str, outcome: FakeOutcome) -> Self {
        self.script.insert(JobId::from(id), outcome);
        self
    }

    pub fn started(&self) -> Vec<JobId> {
        self.started.lock().unwrap().clone()
    }

    pub fn was_started(&self, id: &str) -> bool {
        self.started.lock().unwrap().iter().any(|j| j.as_str() == id)
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl JobRunner for FakeRunner {
    fn run<'a>(&'a self, job: &'a Job) -> RunFuture<'a> {
        Box::pin(async move {
            self.started.lock().unwrap().push(job.id.clone());
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let outcome = self
                .script
                .get(&job.id)
                .copied()
                .unwrap_or_else(FakeOutcome::ok);

            if !outcome.delay.is_zero() {
                tokio::time::sleep(outcome.delay).await;
            } else {
                tokio::task::yield_now().await;
            }

            self.running.fetch_sub(1, Ordering::SeqCst);

            if outcome.panic {
                panic!("scripted panic for {}", job.id);
            }

            if outcome.succeed {
                JobResult::success(job.id.clone(), format!("{} ok", job.id))
            } else {
                JobResult::failure(job.id.clone(), Some(1), format!("{} failed", job.id))
            }
        })
    }
}
