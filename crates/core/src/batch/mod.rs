//! Concurrent batch conversion.
//!
//! The [`BatchScheduler`] fans a list of input files out over a bounded
//! worker pool, collects per-file outcomes in completion order, and folds
//! them into a [`BatchResult`]. Failures stay isolated to their file.

mod config;
mod scheduler;
mod types;

pub use config::SchedulerConfig;
pub use scheduler::{BatchError, BatchScheduler};
pub use types::{BatchFailure, BatchResult, TaskOutcome};
