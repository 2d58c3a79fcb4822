// src/jobs/mod.rs

//! Job records and their preparation for execution.
//!
//! - [`model`] holds the wire record ([`RawJob`]) and the validated [`Job`].
//! - [`store`] loads and validates the JSON job list.
//! - [`classify`] partitions jobs into prediction and aggregate phases.

pub mod classify;
pub mod model;
pub mod store;

pub use classify::{JobPlan, classify};
pub use model::{Job, JobId, JobKind, JobResult, JobType, RawJob};
pub use store::{load_and_validate, load_jobs, validate_jobs};
