//! Translates conversion settings into encoder arguments and output paths.

use std::path::{Path, PathBuf};

use crate::task::ConversionError;

use super::types::{BitrateMode, ConversionSettings, OutputFormat};

/// A fully resolved encoder invocation for one input file.
///
/// `args` holds only the settings-derived directives (codec, bitrate,
/// sample rate, channels); input/output plumbing is added by the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderInvocation {
    /// Input file path.
    pub input_path: PathBuf,
    /// Where the encoder must write the converted file.
    pub output_path: PathBuf,
    /// Settings-derived encoder arguments.
    pub args: Vec<String>,
}

/// Builds the settings-derived encoder arguments.
///
/// Pure translation: the same settings always produce the same arguments.
/// Emits either a bitrate directive or a VBR quality directive, never both.
/// Formats without bitrate support get neither. Sample rate and channel
/// directives are always present.
pub fn build_encoder_args(settings: &ConversionSettings) -> Vec<String> {
    let caps = settings.output_format().capabilities();

    let mut args = vec!["-c:a".to_string(), caps.codec.to_string()];

    if caps.supports_bitrate {
        let vbr_requested = settings.bitrate_mode() == BitrateMode::Variable;
        if vbr_requested && caps.supports_vbr {
            args.push("-q:a".to_string());
            args.push(settings.vbr_quality().to_string());
        } else {
            // VBR on a CBR-only format falls back to constant bitrate.
            args.push("-b:a".to_string());
            args.push(format!("{}k", settings.effective_bitrate()));
        }
    }

    args.push("-ar".to_string());
    args.push(settings.sample_rate().hz().to_string());
    args.push("-ac".to_string());
    args.push(settings.channels().count().to_string());

    args
}

/// Computes the output path for an input file: the input's base name with
/// the format's extension, inside the output directory.
pub fn resolved_output_path(
    format: OutputFormat,
    input_path: &Path,
    output_dir: &Path,
) -> PathBuf {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{}.{}", stem, format.extension()))
}

/// Resolves settings and paths into a complete [`EncoderInvocation`].
///
/// Fails if the output directory does not exist, is not a directory, or is
/// not writable. Never touches the input file.
pub fn resolve(
    settings: &ConversionSettings,
    input_path: &Path,
    output_dir: &Path,
) -> Result<EncoderInvocation, ConversionError> {
    let metadata = std::fs::metadata(output_dir).map_err(|_| {
        ConversionError::invalid_output_path(output_dir, "output directory does not exist")
    })?;

    if !metadata.is_dir() {
        return Err(ConversionError::invalid_output_path(
            output_dir,
            "output path is not a directory",
        ));
    }

    if metadata.permissions().readonly() {
        return Err(ConversionError::invalid_output_path(
            output_dir,
            "output directory is not writable",
        ));
    }

    Ok(EncoderInvocation {
        input_path: input_path.to_path_buf(),
        output_path: resolved_output_path(settings.output_format(), input_path, output_dir),
        args: build_encoder_args(settings),
    })
}
