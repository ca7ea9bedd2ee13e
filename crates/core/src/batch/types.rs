//! Types for the batch module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::task::{ConversionError, ConversionStatus};

/// One file's failure within a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Input file that failed.
    pub path: PathBuf,
    /// Error category tag (see [`ConversionError::kind`]).
    pub kind: String,
    /// User-facing description of the failure.
    pub error: String,
}

/// Summary of a finished batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// Identifier of this run.
    pub run_id: String,
    /// Files enrolled in the batch after input deduplication.
    pub total: usize,
    /// Files that converted successfully.
    pub completed: usize,
    /// Files that failed.
    pub failed: usize,
    /// Per-file failure details, in completion order.
    pub failures: Vec<BatchFailure>,
    /// Wall-clock duration of the whole run in milliseconds.
    pub duration_ms: u64,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
}

impl BatchResult {
    /// Whether every file converted successfully.
    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }
}

/// Terminal outcome of one scheduled file, reported back to the
/// scheduler's aggregation loop.
#[derive(Debug)]
pub struct TaskOutcome {
    /// Input file.
    pub path: PathBuf,
    /// Terminal status the file reached.
    pub status: ConversionStatus,
    /// The failure, if the file did not complete.
    pub error: Option<ConversionError>,
    /// Resolved output path, when the task got far enough to know it.
    pub output_path: Option<PathBuf>,
    /// Wall-clock task duration in milliseconds.
    pub duration_ms: u64,
}

impl TaskOutcome {
    /// Builds an outcome for a file that failed before its task ran.
    pub fn failed_upfront(path: PathBuf, error: ConversionError) -> Self {
        Self {
            path,
            status: ConversionStatus::Failed,
            error: Some(error),
            output_path: None,
            duration_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_result_serialization() {
        let result = BatchResult {
            run_id: "run-1".to_string(),
            total: 3,
            completed: 2,
            failed: 1,
            failures: vec![BatchFailure {
                path: PathBuf::from("/music/bad.mp3"),
                kind: "encoder_process".to_string(),
                error: "The encoder could not convert this file.".to_string(),
            }],
            duration_ms: 1234,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: BatchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total, 3);
        assert_eq!(back.failures.len(), 1);
        assert_eq!(back.failures[0].kind, "encoder_process");
        assert!(!back.is_complete_success());
    }

    #[test]
    fn test_complete_success() {
        let result = BatchResult {
            run_id: "run-2".to_string(),
            total: 2,
            completed: 2,
            failed: 0,
            failures: Vec::new(),
            duration_ms: 10,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };
        assert!(result.is_complete_success());
    }

    #[test]
    fn test_failed_upfront_outcome() {
        let outcome = TaskOutcome::failed_upfront(
            PathBuf::from("/music/dup.mp3"),
            ConversionError::invalid_output_path("/out/dup.mp3", "name collision"),
        );
        assert_eq!(outcome.status, ConversionStatus::Failed);
        assert!(outcome.error.is_some());
        assert_eq!(outcome.duration_ms, 0);
    }
}
