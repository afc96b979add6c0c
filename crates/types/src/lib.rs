#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for lapse
//!
//! This crate provides the value types shared by the timer tree, the event
//! system and configuration: coarse timestamps and generational timer handles.

pub mod id;
pub mod time;

pub use id::TimerId;
pub use time::Timestamp;

use serde::{Deserialize, Serialize};

/// Source of the seconds reported by timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockKind {
    /// Wall clock, seconds since the Unix epoch
    #[default]
    System,
    /// Monotonic clock anchored to the wall clock when the clock is built
    Monotonic,
}

impl std::fmt::Display for ClockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::Monotonic => write!(f, "monotonic"),
        }
    }
}

impl std::str::FromStr for ClockKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "system" | "wall" => Ok(Self::System),
            "monotonic" => Ok(Self::Monotonic),
            _ => Err(s.to_string()),
        }
    }
}
