//! Tracing subscriber setup

use crate::LoggingConfig;
use lapse_errors::{ConfigError, Error};
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins over the configured filter. Calling this again after a
/// subscriber is installed is a no-op.
///
/// # Errors
///
/// Returns an error if the configured filter directive does not parse.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), Error> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| ConfigError::Logging {
            message: e.to_string(),
        })?,
    };

    let installed = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    };

    if !installed {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
