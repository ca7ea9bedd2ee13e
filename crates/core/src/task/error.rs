//! Error types for per-file conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can fail a single file's conversion.
///
/// Every failure a conversion task can hit maps to exactly one of these
/// variants, so callers can branch on [`kind`](ConversionError::kind) and
/// show [`user_message`](ConversionError::user_message) without inspecting
/// internals.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Input file is missing or its extension is not a supported format.
    #[error("Unsupported input format: {format}")]
    UnsupportedFormat { format: String },

    /// Output path cannot be used (missing directory, not a directory,
    /// read-only, or name collision within a batch).
    #[error("Invalid output path {path}: {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },

    /// Encoder process failed to launch, exited non-zero, or timed out.
    #[error("Encoder process failed: {reason}")]
    EncoderProcess {
        reason: String,
        stderr: Option<String>,
    },

    /// Encoder reported success but the output file is missing or empty.
    #[error("Output verification failed for {path}: {reason}")]
    OutputVerification { path: PathBuf, reason: String },

    /// Any failure outside the known categories, including panics caught
    /// at the scheduler boundary.
    #[error("Unexpected conversion failure: {reason}")]
    Unexpected { reason: String },
}

impl ConversionError {
    /// Creates a new unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates a new invalid output path error.
    pub fn invalid_output_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidOutputPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new encoder process error with captured stderr output.
    pub fn encoder_process(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::EncoderProcess {
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates a new output verification error.
    pub fn output_verification(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::OutputVerification {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new unexpected error.
    pub fn unexpected(reason: impl Into<String>) -> Self {
        Self::Unexpected {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable tag for this error's category.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::InvalidOutputPath { .. } => "invalid_output_path",
            Self::EncoderProcess { .. } => "encoder_process",
            Self::OutputVerification { .. } => "output_verification",
            Self::Unexpected { .. } => "unexpected",
        }
    }

    /// Short message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedFormat { format } => format!(
                "\"{}\" is not a supported input. Supported formats: mp3, wav, m4a, flac.",
                format
            ),
            Self::InvalidOutputPath { reason, .. } => {
                format!("The output location cannot be used: {}.", reason)
            }
            Self::EncoderProcess { stderr, .. } => match stderr {
                Some(detail) if !detail.trim().is_empty() => format!(
                    "The encoder could not convert this file: {}",
                    detail.trim()
                ),
                _ => "The encoder could not convert this file.".to_string(),
            },
            Self::OutputVerification { reason, .. } => {
                format!("The converted file was not produced correctly: {}.", reason)
            }
            Self::Unexpected { .. } => {
                "An unexpected error interrupted this conversion.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_stable() {
        assert_eq!(
            ConversionError::unsupported_format("txt").kind(),
            "unsupported_format"
        );
        assert_eq!(
            ConversionError::invalid_output_path("/out", "missing").kind(),
            "invalid_output_path"
        );
        assert_eq!(
            ConversionError::encoder_process("exit 1", None).kind(),
            "encoder_process"
        );
        assert_eq!(
            ConversionError::output_verification("/out/a.mp3", "empty").kind(),
            "output_verification"
        );
        assert_eq!(ConversionError::unexpected("panic").kind(), "unexpected");
    }

    #[test]
    fn test_user_message_includes_stderr_detail() {
        let err = ConversionError::encoder_process(
            "exited with code 1",
            Some("Error: invalid stream\n".to_string()),
        );
        assert!(err.user_message().contains("invalid stream"));

        let bare = ConversionError::encoder_process("exited with code 1", None);
        assert_eq!(
            bare.user_message(),
            "The encoder could not convert this file."
        );
    }

    #[test]
    fn test_unexpected_user_message_hides_internals() {
        let err = ConversionError::unexpected("task panicked: index out of bounds");
        assert!(!err.user_message().contains("panicked"));
    }

    #[test]
    fn test_display_carries_technical_detail() {
        let err = ConversionError::invalid_output_path("/out", "directory does not exist");
        assert_eq!(
            err.to_string(),
            "Invalid output path /out: directory does not exist"
        );
    }
}
