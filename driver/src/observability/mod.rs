//! Logging setup.

use crate::config::TelemetryConfig;
use crate::errors::DriverError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Returns the filter to log with.
///
/// `RUST_LOG` wins when it is set and valid; otherwise the configured filter
/// is used, and `info` if that one does not parse either.
#[must_use]
pub fn env_filter(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global tracing subscriber.
///
/// Logs go to stderr so they never mix with the status lines on stdout.
///
/// # Errors
///
/// Returns [`DriverError::Internal`] if a global subscriber is already set.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), DriverError> {
    let filter = env_filter(config);
    let installed = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    installed.map_err(|e| DriverError::Internal(format!("failed to install tracing subscriber: {e}")))
}
