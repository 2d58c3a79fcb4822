// src/engine/mod.rs

//! Batch execution engine.
//!
//! This module ties together:
//! - the prediction scheduler (bounded worker pool with fail-fast)
//! - the aggregate executor (sequential, gated on completed dependencies)
//! - the batch driver that applies the batch-level gate between the two
//!
//! [`prediction`] owns the concurrent phase, [`aggregate`] the sequential
//! one, and [`batch`] wires them together.

use std::num::NonZeroUsize;

use crate::errors::{JobrunnerError, Result};

/// Upper bound on concurrently running prediction jobs.
///
/// Construction is the only place the limit is validated, so every scheduler
/// entry point goes through [`WorkerLimit::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerLimit(NonZeroUsize);

impl WorkerLimit {
    pub fn new(limit: usize) -> Result<Self> {
        NonZeroUsize::new(limit)
            .map(WorkerLimit)
            .ok_or(JobrunnerError::InvalidWorkerLimit(limit))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

pub mod aggregate;
pub mod batch;
pub mod prediction;

pub use aggregate::{AggregateOutcome, AggregateReport, run_aggregate_batch};
pub use batch::{BatchReport, run_batch};
pub use prediction::{PredictionReport, run_prediction_batch};
