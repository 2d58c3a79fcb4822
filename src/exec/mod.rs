// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`runner`] provides the `JobRunner` trait the schedulers are written
//!   against, so tests can replace real processes with scripted outcomes.
//! - [`process`] is the production `ProcessRunner`, which runs each job's
//!   command with `tokio::process::Command` and captures its output.

pub mod process;
pub mod runner;

pub use process::ProcessRunner;
pub use runner::{JobRunner, RunFuture};
