#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for lapse timer trees
//!
//! Timer trees report lifecycle changes and progress notifications as
//! [`TimerEvent`]s wrapped in an [`EventMessage`] with [`EventMeta`]. Events
//! travel over an unbounded tokio channel so a consumer (UI, logger, test)
//! can drain them at its own pace while the timer tree stays synchronous.

pub mod events;
pub mod logging;
pub mod meta;
pub mod progress;

pub use events::TimerEvent;
pub use logging::log_event;
pub use meta::{EventLevel, EventMeta, EventSource};
pub use progress::TimerSnapshot;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// Event plus the metadata captured when it was emitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: TimerEvent,
}

impl EventMessage {
    #[must_use]
    pub fn new(meta: EventMeta, event: TimerEvent) -> Self {
        Self { meta, event }
    }

    /// Build a message with metadata derived from the event itself
    #[must_use]
    pub fn from_event(event: TimerEvent) -> Self {
        let meta = EventMeta::new(EventLevel::from(event.log_level()), event.event_source());
        Self { meta, event }
    }
}

/// Type alias for the event sender
pub type EventSender = UnboundedSender<EventMessage>;

/// Type alias for the event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<EventMessage>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Single, consistent API for emitting events whether you hold a raw
/// `EventSender` or a struct that contains one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event with pre-built metadata
    fn emit_with_meta(&self, meta: EventMeta, event: TimerEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(EventMessage::new(meta, event));
        }
    }

    /// Emit an event through this emitter
    fn emit(&self, event: TimerEvent) {
        let EventMessage { meta, event } = EventMessage::from_event(event);
        self.emit_with_meta(meta, event);
    }
}

/// Allows `EventSender` to be used directly where `EventEmitter` is expected
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}
