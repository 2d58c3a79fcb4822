// src/config/mod.rs

//! Runner settings for jobrunner.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a settings file from disk (`loader.rs`).
//! - Validate basic invariants such as a non-zero worker limit (`validate.rs`).
//!
//! The settings file is optional; without one every value has a default and
//! the worker limit is derived from the machine's CPU count.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, RawConfigFile, RunnerSection};
