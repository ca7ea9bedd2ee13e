//! Event types emitted during conversion runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::batch::BatchResult;
use crate::task::ConversionStatus;

/// A notification emitted while a conversion run executes.
///
/// Per-file events are emitted by the task that owns the file; batch-level
/// events are emitted only by the scheduler's aggregation loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ConversionEvent {
    /// A file moved to a new lifecycle status.
    FileStatusChanged {
        path: PathBuf,
        status: ConversionStatus,
    },
    /// Encoder progress for one file.
    FileProgress {
        path: PathBuf,
        /// Fraction complete in 0.0..=1.0, 0.0 when the duration is unknown.
        fraction: f32,
        /// Human-readable progress line.
        message: String,
    },
    /// Aggregate batch progress after a file reached a terminal status.
    BatchProgress {
        /// Files that reached a terminal status so far.
        finished: usize,
        /// Files enrolled in the batch.
        total: usize,
        /// `finished / total` in 0.0..=1.0.
        fraction: f32,
    },
    /// The whole batch finished.
    BatchCompleted { result: BatchResult },
}

/// An event wrapped with its emission timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// When the event was emitted.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub event: ConversionEvent,
}
