//! Timer tree error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum TimerError {
    #[error("timer {child} is not a nested child of {parent}")]
    NotAChild { parent: String, child: String },

    #[error("timer {id} has been destroyed")]
    Destroyed { id: String },
}

impl TimerError {
    /// Build a `NotAChild` error from any displayable handles
    pub fn not_a_child(parent: impl std::fmt::Display, child: impl std::fmt::Display) -> Self {
        Self::NotAChild {
            parent: parent.to_string(),
            child: child.to_string(),
        }
    }

    /// Build a `Destroyed` error from any displayable handle
    pub fn destroyed(id: impl std::fmt::Display) -> Self {
        Self::Destroyed { id: id.to_string() }
    }
}

impl UserFacingError for TimerError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotAChild { .. } => {
                Some("Destroy nested timers through the parent that created them.")
            }
            Self::Destroyed { .. } => Some("Drop timer handles once the timer is destroyed."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotAChild { .. } => "timer.not_a_child",
            Self::Destroyed { .. } => "timer.destroyed",
        };
        Some(code)
    }
}
