//! Error types for the settings module.

use super::types::OutputFormat;
use thiserror::Error;

/// Errors produced by settings validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Bitrate is not in the output format's allowed list.
    #[error("Bitrate {bitrate} kbps is not supported for {format}")]
    UnsupportedBitrate { bitrate: u32, format: OutputFormat },

    /// Sample rate is not in the output format's allowed list.
    #[error("Sample rate {rate} Hz is not supported for {format}")]
    UnsupportedSampleRate { rate: u32, format: OutputFormat },

    /// VBR quality value outside the 0-5 range.
    #[error("VBR quality {value} is out of range (expected 0-5)")]
    InvalidVbrQuality { value: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SettingsError::UnsupportedBitrate {
            bitrate: 100,
            format: OutputFormat::Mp3,
        };
        assert_eq!(err.to_string(), "Bitrate 100 kbps is not supported for MP3");

        let err = SettingsError::UnsupportedSampleRate {
            rate: 96000,
            format: OutputFormat::Mp3,
        };
        assert_eq!(
            err.to_string(),
            "Sample rate 96000 Hz is not supported for MP3"
        );

        let err = SettingsError::InvalidVbrQuality { value: 9 };
        assert_eq!(err.to_string(), "VBR quality 9 is out of range (expected 0-5)");
    }
}
