//! Notification callbacks invoked on `touch` and `update`

use lapse_events::{EventEmitter, EventSender, TimerEvent, TimerSnapshot};
use lapse_types::{TimerId, Timestamp};

use crate::state::TimerState;

/// Read-only view of a timer handed to notify handlers
#[derive(Debug, Clone, Copy)]
pub struct TimerView<'a> {
    pub id: TimerId,
    pub state: &'a TimerState,
    /// Completion derived through the active nested timer
    pub effective_fraction: f32,
    pub depth: usize,
}

impl TimerView<'_> {
    pub fn fraction(&self) -> f32 {
        self.state.fraction()
    }

    pub fn start(&self) -> Timestamp {
        self.state.start()
    }

    pub fn now(&self) -> Timestamp {
        self.state.now()
    }

    pub fn predicted_end(&self) -> Timestamp {
        self.state.predicted_end()
    }

    pub fn state_name(&self) -> Option<&str> {
        self.state.state_name()
    }

    /// Owned copy for sending elsewhere
    #[must_use]
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            id: self.id,
            fraction: self.state.fraction(),
            effective_fraction: self.effective_fraction,
            start: self.state.start(),
            now: self.state.now(),
            predicted_end: self.state.predicted_end(),
            state_name: self.state.state_name().map(str::to_owned),
            depth: self.depth,
        }
    }
}

/// Host callback receiving every progress notification.
///
/// `context` is the value supplied when the timer was created; the tree never
/// looks inside it. Closures taking `(&TimerView<'_>, &C)` implement this.
pub trait NotifyHandler<C> {
    fn notify(&mut self, timer: &TimerView<'_>, context: &C);
}

impl<C, F> NotifyHandler<C> for F
where
    F: FnMut(&TimerView<'_>, &C),
{
    fn notify(&mut self, timer: &TimerView<'_>, context: &C) {
        self(timer, context);
    }
}

/// Forwards notifications into an event channel as `TimerEvent::Progress`
#[derive(Debug, Clone)]
pub struct EventNotifier {
    sender: EventSender,
}

impl EventNotifier {
    #[must_use]
    pub fn new(sender: EventSender) -> Self {
        Self { sender }
    }
}

impl EventEmitter for EventNotifier {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.sender)
    }
}

impl<C> NotifyHandler<C> for EventNotifier {
    fn notify(&mut self, timer: &TimerView<'_>, _context: &C) {
        self.emit(TimerEvent::Progress {
            snapshot: timer.snapshot(),
        });
    }
}
