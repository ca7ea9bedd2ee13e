//! Mock encoder for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

use crate::encoder::{EncodeProgress, EncodeReport, Encoder};
use crate::settings::EncoderInvocation;
use crate::task::ConversionError;

/// A recorded encode for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedEncode {
    /// The invocation that was submitted.
    pub invocation: EncoderInvocation,
    /// Whether the encode succeeded.
    pub success: bool,
}

/// Mock implementation of the Encoder trait.
///
/// Provides controllable behavior for testing:
/// - Track encodes for assertions
/// - Simulate success/failure, per path or one-shot
/// - Simulate progress updates and encode duration
/// - Write (or withhold) real output files so verification paths run
/// - Record the peak number of concurrent encodes
///
/// # Example
///
/// ```rust,ignore
/// use morricone_core::testing::MockEncoder;
///
/// let encoder = MockEncoder::new();
///
/// // Make the file at this path fail
/// encoder
///     .set_error_for_path("/music/bad.mp3", ConversionError::encoder_process("exit 1", None))
///     .await;
///
/// // Run a batch, then check what was encoded
/// let encodes = encoder.recorded_encodes().await;
/// assert_eq!(encodes.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct MockEncoder {
    /// Recorded encodes.
    encodes: Arc<RwLock<Vec<RecordedEncode>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ConversionError>>>,
    /// Errors keyed by input path, consumed on use.
    path_errors: Arc<RwLock<HashMap<PathBuf, ConversionError>>>,
    /// Input paths whose encode panics, consumed on use.
    panic_paths: Arc<RwLock<HashSet<PathBuf>>>,
    /// Simulated encode duration in milliseconds.
    encode_duration_ms: Arc<RwLock<u64>>,
    /// Whether to send progress updates during encodes.
    send_progress: Arc<RwLock<bool>>,
    /// Whether to write a placeholder output file.
    write_output: Arc<RwLock<bool>>,
    /// Whether the written output file should be empty.
    write_empty_output: Arc<RwLock<bool>>,
    /// Encodes currently in flight.
    active: Arc<AtomicUsize>,
    /// Highest number of encodes that ran at the same time.
    peak: Arc<AtomicUsize>,
}

impl Default for MockEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEncoder {
    /// Create a new mock encoder.
    pub fn new() -> Self {
        Self {
            encodes: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            path_errors: Arc::new(RwLock::new(HashMap::new())),
            panic_paths: Arc::new(RwLock::new(HashSet::new())),
            encode_duration_ms: Arc::new(RwLock::new(100)),
            send_progress: Arc::new(RwLock::new(true)),
            write_output: Arc::new(RwLock::new(true)),
            write_empty_output: Arc::new(RwLock::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get all recorded encodes.
    pub async fn recorded_encodes(&self) -> Vec<RecordedEncode> {
        self.encodes.read().await.clone()
    }

    /// Clear recorded encodes.
    pub async fn clear_recorded(&self) {
        self.encodes.write().await.clear();
    }

    /// Get the number of encodes performed.
    pub async fn encode_count(&self) -> usize {
        self.encodes.read().await.len()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ConversionError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    /// Configure encodes of a specific input path to fail once.
    pub async fn set_error_for_path(&self, path: impl AsRef<Path>, error: ConversionError) {
        self.path_errors
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), error);
    }

    /// Configure the encode of a specific input path to panic once.
    pub async fn set_panic_for_path(&self, path: impl AsRef<Path>) {
        self.panic_paths
            .write()
            .await
            .insert(path.as_ref().to_path_buf());
    }

    /// Set the simulated encode duration.
    pub async fn set_encode_duration(&self, duration: Duration) {
        *self.encode_duration_ms.write().await = duration.as_millis() as u64;
    }

    /// Enable or disable progress updates during encodes.
    pub async fn set_send_progress(&self, send: bool) {
        *self.send_progress.write().await = send;
    }

    /// Enable or disable writing a placeholder output file.
    pub async fn set_write_output(&self, write: bool) {
        *self.write_output.write().await = write;
    }

    /// Make written output files empty, to exercise verification.
    pub async fn set_write_empty_output(&self, empty: bool) {
        *self.write_empty_output.write().await = empty;
    }

    /// Highest number of encodes observed running at the same time.
    pub fn peak_concurrent(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn run_encode(
        &self,
        invocation: &EncoderInvocation,
        progress_tx: Option<&mpsc::Sender<EncodeProgress>>,
    ) -> Result<EncodeReport, ConversionError> {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(active, Ordering::SeqCst);
        let result = self.run_encode_inner(invocation, progress_tx).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn run_encode_inner(
        &self,
        invocation: &EncoderInvocation,
        progress_tx: Option<&mpsc::Sender<EncodeProgress>>,
    ) -> Result<EncodeReport, ConversionError> {
        if self
            .panic_paths
            .write()
            .await
            .remove(&invocation.input_path)
        {
            panic!(
                "mock encoder panic for {}",
                invocation.input_path.display()
            );
        }

        let mut injected = self
            .path_errors
            .write()
            .await
            .remove(&invocation.input_path);
        if injected.is_none() {
            injected = self.next_error.write().await.take();
        }
        if let Some(error) = injected {
            self.encodes.write().await.push(RecordedEncode {
                invocation: invocation.clone(),
                success: false,
            });
            return Err(error);
        }

        // Simulate encode time, with progress steps when enabled.
        let duration_ms = *self.encode_duration_ms.read().await;
        let send_progress = progress_tx.is_some() && *self.send_progress.read().await;
        if send_progress && duration_ms > 0 {
            let steps = 5;
            let step_duration = duration_ms / steps;
            for i in 0..steps {
                if let Some(tx) = progress_tx {
                    let _ = tx
                        .send(EncodeProgress {
                            fraction: (i + 1) as f32 / steps as f32,
                            time_secs: (i as f64 + 1.0) * (step_duration as f64 / 1000.0),
                            speed: Some("10x".to_string()),
                        })
                        .await;
                }
                tokio::time::sleep(Duration::from_millis(step_duration)).await;
            }
        } else if duration_ms > 0 {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        }

        if *self.write_output.read().await {
            let contents: &[u8] = if *self.write_empty_output.read().await {
                b""
            } else {
                b"mock encoded audio"
            };
            if let Err(e) = tokio::fs::write(&invocation.output_path, contents).await {
                self.encodes.write().await.push(RecordedEncode {
                    invocation: invocation.clone(),
                    success: false,
                });
                return Err(ConversionError::encoder_process(
                    format!("mock failed to write output: {}", e),
                    None,
                ));
            }
        }

        self.encodes.write().await.push(RecordedEncode {
            invocation: invocation.clone(),
            success: true,
        });

        Ok(EncodeReport { duration_ms })
    }
}

#[async_trait]
impl Encoder for MockEncoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn encode(&self, invocation: &EncoderInvocation) -> Result<EncodeReport, ConversionError> {
        self.run_encode(invocation, None).await
    }

    async fn encode_with_progress(
        &self,
        invocation: &EncoderInvocation,
        progress_tx: mpsc::Sender<EncodeProgress>,
    ) -> Result<EncodeReport, ConversionError> {
        self.run_encode(invocation, Some(&progress_tx)).await
    }

    async fn validate(&self) -> Result<(), ConversionError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        Ok(())
    }
}
