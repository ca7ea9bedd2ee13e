use chrono::Utc;
use tokio::sync::mpsc;

use super::{ConversionEvent, EventEnvelope};

/// Handle for emitting conversion events.
///
/// This is cheaply cloneable and can be shared across tasks. Events are
/// sent through an async channel to whatever front end is listening; a
/// disabled sink drops them without allocating a channel.
#[derive(Clone)]
pub struct EventSink {
    tx: Option<mpsc::Sender<EventEnvelope>>,
}

impl EventSink {
    /// Creates a new sink from a channel sender.
    pub fn new(tx: mpsc::Sender<EventEnvelope>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Creates a sink that silently drops every event.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Emits an event asynchronously.
    ///
    /// If the channel is closed, the error is logged but the caller is not
    /// blocked or failed. A disabled sink is a no-op.
    pub async fn emit(&self, event: ConversionEvent) {
        if let Some(tx) = &self.tx {
            let envelope = EventEnvelope {
                timestamp: Utc::now(),
                event,
            };
            if let Err(e) = tx.send(envelope).await {
                tracing::error!("Failed to emit conversion event: {}", e);
            }
        }
    }

    /// Tries to emit an event without blocking.
    ///
    /// Returns true if the event was sent. A disabled sink always returns
    /// false.
    pub fn try_emit(&self, event: ConversionEvent) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };
        let envelope = EventEnvelope {
            timestamp: Utc::now(),
            event,
        };
        match tx.try_send(envelope) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to emit conversion event: {}", e);
                false
            }
        }
    }
}
