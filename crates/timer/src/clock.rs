//! Time sources for timer trees

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use lapse_types::{ClockKind, Timestamp};

/// Source of the current time, in whole seconds
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock, seconds since the Unix epoch
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Wall-clock anchored clock that only moves forward.
///
/// Reads the wall clock once at construction and advances by the monotonic
/// elapsed time after that, so system clock adjustments never make a timer
/// run backwards.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    anchor: Timestamp,
    origin: Instant,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            anchor: Timestamp::now(),
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        let elapsed = i64::try_from(self.origin.elapsed().as_secs()).unwrap_or(i64::MAX);
        self.anchor.plus_secs(elapsed)
    }
}

/// Hand-driven clock. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    secs: Rc<Cell<i64>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            secs: Rc::new(Cell::new(start.as_secs())),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.secs.set(now.as_secs());
    }

    pub fn advance(&self, secs: i64) {
        self.secs.set(self.secs.get().saturating_add(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_secs(self.secs.get())
    }
}

/// Build the clock selected in configuration
#[must_use]
pub fn clock_for(kind: ClockKind) -> Box<dyn Clock> {
    match kind {
        ClockKind::System => Box::new(SystemClock),
        ClockKind::Monotonic => Box::new(MonotonicClock::new()),
    }
}
