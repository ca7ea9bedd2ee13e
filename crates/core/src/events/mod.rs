//! Typed event channel for observing conversion runs.
//!
//! Front ends subscribe by keeping the receiving end of an
//! [`EventEnvelope`] channel and handing the sender to an [`EventSink`].
//! The engine emits per-file status and progress events plus batch-level
//! aggregates; a disabled sink turns all of it off.

mod handle;
mod types;

pub use handle::EventSink;
pub use types::{ConversionEvent, EventEnvelope};
