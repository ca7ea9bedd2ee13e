//! Single-file conversion task.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::encoder::{EncodeProgress, Encoder};
use crate::events::{ConversionEvent, EventSink};
use crate::settings::{resolve, ConversionSettings};

use super::error::ConversionError;
use super::types::{is_supported_input, ConversionStatus, MediaFile};

/// Runs the full conversion lifecycle for one input file.
///
/// The task owns its [`MediaFile`] and is the only writer of its status.
/// Every status change is announced through the event sink, so an observer
/// sees `processing` followed by exactly one terminal status per file.
pub struct ConversionTask<E: Encoder> {
    media: MediaFile,
    settings: Arc<ConversionSettings>,
    output_dir: PathBuf,
    encoder: Arc<E>,
    output_path: Option<PathBuf>,
}

impl<E: Encoder + 'static> ConversionTask<E> {
    /// Creates a new pending task for one input file.
    pub fn new(
        input_path: impl Into<PathBuf>,
        settings: Arc<ConversionSettings>,
        output_dir: impl Into<PathBuf>,
        encoder: Arc<E>,
    ) -> Self {
        Self {
            media: MediaFile::new(input_path),
            settings,
            output_dir: output_dir.into(),
            encoder,
            output_path: None,
        }
    }

    /// The file this task converts, with its current status.
    pub fn media(&self) -> &MediaFile {
        &self.media
    }

    /// The resolved output path, once the task has progressed far enough
    /// to know it.
    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    /// Runs the conversion to a terminal status.
    ///
    /// Always leaves the file in `completed` or `failed`; the returned
    /// error mirrors the failure recorded on the file.
    pub async fn run(&mut self, events: &EventSink) -> Result<(), ConversionError> {
        debug!("Starting conversion of {}", self.media.name());

        // Input checks happen before the file is marked as processing.
        if !self.media.path().exists() || !is_supported_input(self.media.path()) {
            let format = self
                .media
                .extension()
                .unwrap_or_else(|| "unknown".to_string());
            let error = ConversionError::unsupported_format(format);
            return Err(self.fail(events, error).await);
        }

        self.set_status(events, ConversionStatus::Processing).await;

        let invocation = match resolve(&self.settings, self.media.path(), &self.output_dir) {
            Ok(invocation) => invocation,
            Err(e) => return Err(self.fail(events, e).await),
        };
        self.output_path = Some(invocation.output_path.clone());

        // Forward encoder progress as per-file events.
        let (progress_tx, mut progress_rx) = mpsc::channel::<EncodeProgress>(32);
        let progress_events = events.clone();
        let progress_path = self.media.path().to_path_buf();
        let forwarder = tokio::spawn(async move {
            while let Some(progress) = progress_rx.recv().await {
                let message = match &progress.speed {
                    Some(speed) => format!("{:.0}s processed ({})", progress.time_secs, speed),
                    None => format!("{:.0}s processed", progress.time_secs),
                };
                progress_events
                    .emit(ConversionEvent::FileProgress {
                        path: progress_path.clone(),
                        fraction: progress.fraction,
                        message,
                    })
                    .await;
            }
        });

        let encode_result = self
            .encoder
            .encode_with_progress(&invocation, progress_tx)
            .await;
        // The encoder dropped its sender, so the forwarder drains and exits.
        let _ = forwarder.await;

        if let Err(e) = encode_result {
            return Err(self.fail(events, e).await);
        }

        if let Err(e) = self.verify_output(&invocation.output_path).await {
            return Err(self.fail(events, e).await);
        }

        self.set_status(events, ConversionStatus::Completed).await;
        info!(
            "Converted {} -> {}",
            self.media.name(),
            invocation.output_path.display()
        );
        Ok(())
    }

    /// Checks that the encoder actually produced a usable file.
    async fn verify_output(&self, output_path: &Path) -> Result<(), ConversionError> {
        let metadata = tokio::fs::metadata(output_path).await.map_err(|_| {
            ConversionError::output_verification(output_path, "output file was not created")
        })?;

        if metadata.len() == 0 {
            return Err(ConversionError::output_verification(
                output_path,
                "output file is empty",
            ));
        }

        Ok(())
    }

    async fn set_status(&mut self, events: &EventSink, status: ConversionStatus) {
        self.media.set_status(status);
        events
            .emit(ConversionEvent::FileStatusChanged {
                path: self.media.path().to_path_buf(),
                status,
            })
            .await;
    }

    async fn fail(&mut self, events: &EventSink, error: ConversionError) -> ConversionError {
        warn!("Conversion of {} failed: {}", self.media.name(), error);
        self.set_status(events, ConversionStatus::Failed).await;
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockEncoder;
    use tempfile::TempDir;

    struct TaskSetup {
        encoder: MockEncoder,
        source_dir: TempDir,
        output_dir: TempDir,
    }

    impl TaskSetup {
        fn new() -> Self {
            Self {
                encoder: MockEncoder::new(),
                source_dir: TempDir::new().expect("create source dir"),
                output_dir: TempDir::new().expect("create output dir"),
            }
        }

        fn create_source(&self, name: &str) -> PathBuf {
            let path = self.source_dir.path().join(name);
            std::fs::write(&path, b"fake audio data").expect("write source file");
            path
        }

        fn task(&self, input: PathBuf) -> ConversionTask<MockEncoder> {
            ConversionTask::new(
                input,
                Arc::new(ConversionSettings::default()),
                self.output_dir.path(),
                Arc::new(self.encoder.clone()),
            )
        }
    }

    #[tokio::test]
    async fn test_run_completes_and_writes_output() {
        let setup = TaskSetup::new();
        let input = setup.create_source("track.wav");
        let mut task = setup.task(input);

        task.run(&EventSink::disabled()).await.unwrap();

        assert_eq!(task.media().status(), ConversionStatus::Completed);
        let output = task.output_path().unwrap();
        assert_eq!(output, setup.output_dir.path().join("track.mp3"));
        assert!(output.exists());
        assert_eq!(setup.encoder.encode_count().await, 1);
    }

    #[tokio::test]
    async fn test_run_rejects_unsupported_extension() {
        let setup = TaskSetup::new();
        let input = setup.create_source("notes.txt");
        let mut task = setup.task(input);

        let err = task.run(&EventSink::disabled()).await.unwrap_err();

        assert_eq!(err.kind(), "unsupported_format");
        assert_eq!(task.media().status(), ConversionStatus::Failed);
        assert_eq!(setup.encoder.encode_count().await, 0);
    }

    #[tokio::test]
    async fn test_run_rejects_missing_file() {
        let setup = TaskSetup::new();
        let input = setup.source_dir.path().join("never_created.mp3");
        let mut task = setup.task(input);

        let err = task.run(&EventSink::disabled()).await.unwrap_err();

        assert_eq!(err.kind(), "unsupported_format");
        assert_eq!(task.media().status(), ConversionStatus::Failed);
    }

    #[tokio::test]
    async fn test_run_fails_on_missing_output_dir() {
        let setup = TaskSetup::new();
        let input = setup.create_source("track.flac");
        let mut task = ConversionTask::new(
            input,
            Arc::new(ConversionSettings::default()),
            setup.output_dir.path().join("nope"),
            Arc::new(setup.encoder.clone()),
        );

        let err = task.run(&EventSink::disabled()).await.unwrap_err();

        assert_eq!(err.kind(), "invalid_output_path");
        assert_eq!(task.media().status(), ConversionStatus::Failed);
        assert_eq!(setup.encoder.encode_count().await, 0);
    }

    #[tokio::test]
    async fn test_run_maps_encoder_failure() {
        let setup = TaskSetup::new();
        setup
            .encoder
            .set_next_error(ConversionError::encoder_process("exit 1", None))
            .await;
        let input = setup.create_source("track.m4a");
        let mut task = setup.task(input);

        let err = task.run(&EventSink::disabled()).await.unwrap_err();

        assert_eq!(err.kind(), "encoder_process");
        assert_eq!(task.media().status(), ConversionStatus::Failed);
    }

    #[tokio::test]
    async fn test_run_verifies_output_exists() {
        let setup = TaskSetup::new();
        setup.encoder.set_write_output(false).await;
        let input = setup.create_source("track.mp3");
        let mut task = setup.task(input);

        let err = task.run(&EventSink::disabled()).await.unwrap_err();

        assert_eq!(err.kind(), "output_verification");
        assert_eq!(task.media().status(), ConversionStatus::Failed);
    }

    #[tokio::test]
    async fn test_run_verifies_output_nonempty() {
        let setup = TaskSetup::new();
        setup.encoder.set_write_empty_output(true).await;
        let input = setup.create_source("track.mp3");
        let mut task = setup.task(input);

        let err = task.run(&EventSink::disabled()).await.unwrap_err();

        assert_eq!(err.kind(), "output_verification");
    }
}
