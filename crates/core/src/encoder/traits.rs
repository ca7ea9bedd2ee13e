//! Trait definitions for the encoder module.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::settings::EncoderInvocation;
use crate::task::ConversionError;

use super::types::{EncodeProgress, EncodeReport};

/// An encoder that can execute a resolved invocation.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Returns the name of this encoder implementation.
    fn name(&self) -> &str;

    /// Runs one encode to completion.
    async fn encode(&self, invocation: &EncoderInvocation) -> Result<EncodeReport, ConversionError>;

    /// Runs one encode with progress reporting.
    ///
    /// The progress sender receives updates during the encode. If the
    /// receiver is dropped, the encode continues without progress reporting.
    async fn encode_with_progress(
        &self,
        invocation: &EncoderInvocation,
        progress_tx: mpsc::Sender<EncodeProgress>,
    ) -> Result<EncodeReport, ConversionError>;

    /// Validates that the encoder is properly configured and ready.
    async fn validate(&self) -> Result<(), ConversionError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct NoopEncoder;

    #[async_trait]
    impl Encoder for NoopEncoder {
        fn name(&self) -> &str {
            "noop"
        }

        async fn encode(
            &self,
            _invocation: &EncoderInvocation,
        ) -> Result<EncodeReport, ConversionError> {
            Ok(EncodeReport { duration_ms: 1 })
        }

        async fn encode_with_progress(
            &self,
            invocation: &EncoderInvocation,
            progress_tx: mpsc::Sender<EncodeProgress>,
        ) -> Result<EncodeReport, ConversionError> {
            let _ = progress_tx
                .send(EncodeProgress {
                    fraction: 1.0,
                    time_secs: 0.0,
                    speed: None,
                })
                .await;
            self.encode(invocation).await
        }

        async fn validate(&self) -> Result<(), ConversionError> {
            Ok(())
        }
    }

    fn invocation() -> EncoderInvocation {
        EncoderInvocation {
            input_path: PathBuf::from("/test/input.wav"),
            output_path: PathBuf::from("/test/output.mp3"),
            args: vec!["-c:a".to_string(), "libmp3lame".to_string()],
        }
    }

    #[tokio::test]
    async fn test_encoder_as_trait_object() {
        let encoder: Box<dyn Encoder> = Box::new(NoopEncoder);
        assert_eq!(encoder.name(), "noop");
        let report = encoder.encode(&invocation()).await.unwrap();
        assert_eq!(report.duration_ms, 1);
    }

    #[tokio::test]
    async fn test_encode_with_progress_sends_updates() {
        let encoder = NoopEncoder;
        let (tx, mut rx) = mpsc::channel(4);
        encoder
            .encode_with_progress(&invocation(), tx)
            .await
            .unwrap();
        let progress = rx.recv().await.unwrap();
        assert!((progress.fraction - 1.0).abs() < f32::EPSILON);
    }
}
