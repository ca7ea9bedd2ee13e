//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides a mock implementation of the [`Encoder`](crate::encoder::Encoder)
//! trait, allowing comprehensive lifecycle and batch testing without ffmpeg installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use morricone_core::testing::MockEncoder;
//!
//! let encoder = MockEncoder::new();
//!
//! // Configure mock behavior
//! encoder.set_encode_duration(Duration::from_millis(50)).await;
//! encoder.set_error_for_path("/music/broken.mp3", error).await;
//!
//! // Use in a BatchScheduler...
//! ```

mod mock_encoder;

pub use mock_encoder::{MockEncoder, RecordedEncode};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::settings::{ConversionSettings, OutputFormat, Quality};
    use std::path::{Path, PathBuf};

    /// Write a placeholder source file and return its path.
    pub fn write_source_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"fake audio data").expect("write source file");
        path
    }

    /// Create settings targeting the given format with reasonable defaults.
    pub fn settings_for(format: OutputFormat) -> ConversionSettings {
        let mut settings = ConversionSettings::default();
        settings.set_output_format(format);
        settings.set_quality(Quality::Good);
        settings
    }
}
