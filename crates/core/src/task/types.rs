//! Types for the conversion task module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Input file extensions the engine accepts, lowercase.
pub const SUPPORTED_INPUT_EXTENSIONS: [&str; 4] = ["mp3", "wav", "m4a", "flac"];

/// Whether a path has a supported input extension (case-insensitive).
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_INPUT_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Lifecycle state of a single file's conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    /// Queued, not yet started.
    Pending,
    /// Encoder is running (or about to run) for this file.
    Processing,
    /// Conversion finished and the output was verified.
    Completed,
    /// Conversion failed; the file will not be retried.
    Failed,
}

impl ConversionStatus {
    /// Stable lowercase name for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether this status is final.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A file enrolled in a conversion run, with its current status.
///
/// The status starts at [`ConversionStatus::Pending`] and is advanced only
/// by the conversion task that owns the file.
#[derive(Debug, Clone)]
pub struct MediaFile {
    path: PathBuf,
    status: ConversionStatus,
}

impl MediaFile {
    /// Creates a new pending media file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            status: ConversionStatus::Pending,
        }
    }

    /// Full path of the input file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without directories, for display.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Lowercase file extension, if any.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }

    /// Current lifecycle status.
    pub fn status(&self) -> ConversionStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: ConversionStatus) {
        self.status = status;
    }
}
