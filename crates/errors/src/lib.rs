#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for lapse
//!
//! This crate provides fine-grained error types organized by domain.
//! All error types implement Clone for easier handling.

use std::borrow::Cow;

use thiserror::Error;

pub mod config;
pub mod timer;

// Re-export all error types at the root
pub use config::ConfigError;
pub use timer::TimerError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("timer error: {0}")]
    Timer(#[from] TimerError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for lapse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for display to an operator.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Timer(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Timer(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Timer(err) => err.is_retryable(),
            Error::Config(err) => err.is_retryable(),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Timer(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
        }
    }
}
