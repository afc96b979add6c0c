use lapse_types::TimerId;
use serde::{Deserialize, Serialize};

use crate::progress::TimerSnapshot;
use crate::EventSource;

/// Everything a timer tree reports to the outside world
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    /// A root timer was created
    Created { id: TimerId },

    /// A nested timer was created under `parent`
    NestedCreated {
        parent: TimerId,
        child: TimerId,
        /// Parent fraction at which the child's span begins
        span_start: f32,
        /// Share of the parent's progress the child represents
        span_share: f32,
    },

    /// A timer notified its handler (`touch` or `update`)
    Progress { snapshot: TimerSnapshot },

    /// A timer was reset to a fresh baseline
    Reset { id: TimerId },

    /// A timer's state label changed
    StateChanged {
        id: TimerId,
        state_name: Option<String>,
    },

    /// A nested timer and its descendants were destroyed
    NestedDestroyed {
        parent: TimerId,
        child: TimerId,
        released: usize,
    },

    /// A timer and its descendants were destroyed
    Destroyed { id: TimerId, released: usize },
}

impl TimerEvent {
    /// Timer the event is about
    #[must_use]
    pub fn timer_id(&self) -> TimerId {
        match self {
            Self::Created { id }
            | Self::Reset { id }
            | Self::StateChanged { id, .. }
            | Self::Destroyed { id, .. } => *id,
            Self::NestedCreated { child, .. } | Self::NestedDestroyed { child, .. } => *child,
            Self::Progress { snapshot } => snapshot.id,
        }
    }

    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::NestedCreated { .. } | Self::NestedDestroyed { .. } => EventSource::NESTING,
            _ => EventSource::TIMER,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::Progress { .. } => Level::TRACE,
            Self::Reset { .. } | Self::StateChanged { .. } => Level::DEBUG,
            Self::Created { .. }
            | Self::NestedCreated { .. }
            | Self::NestedDestroyed { .. }
            | Self::Destroyed { .. } => Level::INFO,
        }
    }

    /// Short past-tense description used as the log message
    #[must_use]
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Created { .. } => "timer created",
            Self::NestedCreated { .. } => "nested timer created",
            Self::Progress { .. } => "timer progressed",
            Self::Reset { .. } => "timer reset",
            Self::StateChanged { .. } => "timer state changed",
            Self::NestedDestroyed { .. } => "nested timer destroyed",
            Self::Destroyed { .. } => "timer destroyed",
        }
    }
}
