//! Conversion settings and their translation into encoder invocations.
//!
//! The settings model captures everything a user can choose about the
//! output (format, quality, bitrate, sample rate, channels, bitrate mode),
//! and the resolver turns a settings value plus an input path into the
//! exact encoder arguments and output path for that file.

mod error;
mod resolver;
mod types;

pub use error::SettingsError;
pub use resolver::{build_encoder_args, resolve, resolved_output_path, EncoderInvocation};
pub use types::{
    vbr_quality_label, BitrateMode, Channels, ConversionSettings, FormatCapabilities,
    OutputFormat, Quality, SampleRate, VBR_QUALITY_LABELS,
};
