//! Batch scheduler implementation.

use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::FutureExt;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::encoder::Encoder;
use crate::events::{ConversionEvent, EventSink};
use crate::settings::{resolved_output_path, ConversionSettings, SettingsError};
use crate::task::{ConversionError, ConversionStatus, ConversionTask};

use super::config::SchedulerConfig;
use super::types::{BatchFailure, BatchResult, TaskOutcome};

/// Error type for batch operations.
///
/// These reject the whole run before any file is touched; per-file
/// failures never surface here, they are collected in the
/// [`BatchResult`] instead.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// A worker pool of size zero can make no progress.
    #[error("Invalid max_concurrency: {value} (must be at least 1)")]
    InvalidConcurrency { value: usize },

    /// Settings failed validation.
    #[error("Invalid conversion settings: {0}")]
    InvalidSettings(#[from] SettingsError),
}

/// Running counts for one batch, updated only by the aggregation loop.
struct BatchTally {
    total: usize,
    finished: usize,
    completed: usize,
    failed: usize,
    failures: Vec<BatchFailure>,
}

impl BatchTally {
    fn new(total: usize) -> Self {
        Self {
            total,
            finished: 0,
            completed: 0,
            failed: 0,
            failures: Vec::new(),
        }
    }

    fn record(&mut self, outcome: TaskOutcome) {
        self.finished += 1;
        if outcome.status == ConversionStatus::Completed {
            self.completed += 1;
            debug!(
                "Finished {} in {} ms",
                outcome.path.display(),
                outcome.duration_ms
            );
        } else {
            self.failed += 1;
            let (kind, error) = match &outcome.error {
                Some(error) => (error.kind().to_string(), error.user_message()),
                // A failed task always carries its error; keep the tally
                // honest if one ever slips through without it.
                None => (
                    "unexpected".to_string(),
                    "An unexpected error interrupted this conversion.".to_string(),
                ),
            };
            self.failures.push(BatchFailure {
                path: outcome.path,
                kind,
                error,
            });
        }
    }

    fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.finished as f32 / self.total as f32
        }
    }
}

/// Runs batches of conversions over a bounded worker pool.
///
/// Each file gets its own [`ConversionTask`]; at most
/// [`SchedulerConfig::max_concurrency`] of them encode at the same time.
/// Outcomes are aggregated in completion order, so one slow file never
/// stalls the others' results, and one failed or panicking file never
/// aborts the rest of the batch.
pub struct BatchScheduler<E: Encoder> {
    config: SchedulerConfig,
    encoder: Arc<E>,
    events: EventSink,
}

impl<E: Encoder + 'static> BatchScheduler<E> {
    /// Creates a new scheduler with the given configuration.
    pub fn new(config: SchedulerConfig, encoder: E) -> Self {
        Self {
            config,
            encoder: Arc::new(encoder),
            events: EventSink::disabled(),
        }
    }

    /// Creates a new scheduler with default configuration.
    pub fn with_defaults(encoder: E) -> Self {
        Self::new(SchedulerConfig::default(), encoder)
    }

    /// Sets the event sink notified during runs.
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Converts a batch of input files with shared settings.
    ///
    /// Returns once every file has reached a terminal status. The result
    /// always covers the full batch: files that fail up front (duplicate
    /// output names) and files whose tasks panic are tallied as failures
    /// alongside ordinary encoder errors.
    pub async fn run_batch(
        &self,
        inputs: Vec<PathBuf>,
        settings: &ConversionSettings,
        output_dir: &Path,
    ) -> Result<BatchResult, BatchError> {
        if self.config.max_concurrency == 0 {
            return Err(BatchError::InvalidConcurrency { value: 0 });
        }
        settings.validate()?;

        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let start = Instant::now();

        // First occurrence wins; converting the same input twice in one
        // run would just race over the same output file.
        let mut seen = HashSet::new();
        let mut files: Vec<PathBuf> = Vec::new();
        for path in inputs {
            if seen.insert(path.clone()) {
                files.push(path);
            } else {
                debug!("Skipping duplicate input {}", path.display());
            }
        }
        let total = files.len();

        info!(
            "Starting batch {} ({} files, {} workers, target {})",
            run_id,
            total,
            self.config.max_concurrency,
            settings.output_format()
        );

        // Distinct inputs can still map to the same output name. The
        // first claim wins and later ones fail instead of silently
        // overwriting the winner's result.
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
        let mut collisions: Vec<TaskOutcome> = Vec::new();
        let mut runnable: Vec<PathBuf> = Vec::new();
        for path in files {
            let output = resolved_output_path(settings.output_format(), &path, output_dir);
            if let Some(first) = claimed.get(&output) {
                warn!(
                    "Output collision for {}: {} already produces {}",
                    path.display(),
                    first.display(),
                    output.display()
                );
                let error = ConversionError::invalid_output_path(
                    output,
                    format!("output name already taken by {}", first.display()),
                );
                collisions.push(TaskOutcome::failed_upfront(path, error));
            } else {
                claimed.insert(output, path.clone());
                runnable.push(path);
            }
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let (outcome_tx, mut outcome_rx) = mpsc::channel::<TaskOutcome>(total.max(1));
        let settings = Arc::new(settings.clone());

        for path in runnable {
            let semaphore = Arc::clone(&semaphore);
            let encoder = Arc::clone(&self.encoder);
            let settings = Arc::clone(&settings);
            let output_dir = output_dir.to_path_buf();
            let events = self.events.clone();
            let outcome_tx = outcome_tx.clone();

            tokio::spawn(async move {
                let outcome =
                    Self::run_task(path, settings, output_dir, encoder, semaphore, events).await;
                if outcome_tx.send(outcome).await.is_err() {
                    error!("Batch outcome receiver dropped before all tasks finished");
                }
            });
        }
        drop(outcome_tx);

        let mut tally = BatchTally::new(total);

        // Collision failures are terminal outcomes like any other; they
        // just never reached a worker, so their status event is emitted
        // here instead of by a task.
        for outcome in collisions {
            self.events
                .emit(ConversionEvent::FileStatusChanged {
                    path: outcome.path.clone(),
                    status: ConversionStatus::Failed,
                })
                .await;
            tally.record(outcome);
            self.emit_progress(&tally).await;
        }

        while let Some(outcome) = outcome_rx.recv().await {
            tally.record(outcome);
            self.emit_progress(&tally).await;
        }

        let result = BatchResult {
            run_id,
            total,
            completed: tally.completed,
            failed: tally.failed,
            failures: tally.failures,
            duration_ms: start.elapsed().as_millis() as u64,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            "Batch {} finished: {}/{} completed, {} failed in {} ms",
            result.run_id, result.completed, result.total, result.failed, result.duration_ms
        );
        self.events
            .emit(ConversionEvent::BatchCompleted {
                result: result.clone(),
            })
            .await;

        Ok(result)
    }

    /// Runs one file's task inside the worker pool.
    ///
    /// A panic in the task is caught here so the batch keeps going; the
    /// file is reported as failed with an unexpected error.
    async fn run_task(
        path: PathBuf,
        settings: Arc<ConversionSettings>,
        output_dir: PathBuf,
        encoder: Arc<E>,
        semaphore: Arc<Semaphore>,
        events: EventSink,
    ) -> TaskOutcome {
        let _permit = match semaphore.acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                return TaskOutcome::failed_upfront(
                    path,
                    ConversionError::unexpected("worker pool closed before the task could run"),
                )
            }
        };

        let start = Instant::now();
        let mut task = ConversionTask::new(path.clone(), settings, output_dir, encoder);
        let run = AssertUnwindSafe(task.run(&events)).catch_unwind().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match run {
            Ok(result) => TaskOutcome {
                path,
                status: task.media().status(),
                error: result.err(),
                output_path: task.output_path().map(Path::to_path_buf),
                duration_ms,
            },
            Err(panic) => {
                let reason = panic_reason(panic);
                error!(
                    "Conversion task for {} panicked: {}",
                    path.display(),
                    reason
                );
                // The panicked task never reported a terminal status itself.
                events
                    .emit(ConversionEvent::FileStatusChanged {
                        path: path.clone(),
                        status: ConversionStatus::Failed,
                    })
                    .await;
                TaskOutcome {
                    path,
                    status: ConversionStatus::Failed,
                    error: Some(ConversionError::unexpected(format!(
                        "conversion task panicked: {}",
                        reason
                    ))),
                    output_path: None,
                    duration_ms,
                }
            }
        }
    }

    async fn emit_progress(&self, tally: &BatchTally) {
        self.events
            .emit(ConversionEvent::BatchProgress {
                finished: tally.finished,
                total: tally.total,
                fraction: tally.fraction(),
            })
            .await;
    }
}

fn panic_reason(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
