//! Per-file conversion lifecycle.
//!
//! A [`ConversionTask`] takes one input file from `pending` through
//! `processing` to `completed` or `failed`, emitting an event on every
//! transition. Failures are captured as [`ConversionError`] values; a task
//! never takes its neighbors down with it.

mod error;
mod types;
mod unit;

pub use error::ConversionError;
pub use types::{
    is_supported_input, ConversionStatus, MediaFile, SUPPORTED_INPUT_EXTENSIONS,
};
pub use unit::ConversionTask;
