//! `tracing-subscriber` initialization

use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Crates whose level the `-v` flags raise
const OWN_CRATES: &[&str] = &[
    "ics_to_wiki",
    "domain",
    "application",
    "infrastructure",
    "integration_ical",
    "integration_mediawiki",
];

/// Errors that can occur while installing the subscriber
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directives could not be parsed
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter {
        /// The rejected directives
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

/// Filter directives for the configured filter and `-v` count
///
/// `-v` raises this workspace's crates to `debug`, `-vv` to `trace`, and
/// `-vvv` traces everything.
pub fn filter_directives(config: &LoggingConfig, verbosity: u8) -> String {
    let level = match verbosity {
        0 => return config.filter.clone(),
        1 => "debug",
        2 => "trace",
        _ => return "trace".to_string(),
    };

    OWN_CRATES
        .iter()
        .fold(config.filter.clone(), |mut directives, krate| {
            directives.push_str(&format!(",{krate}={level}"));
            directives
        })
}

/// Install the global subscriber
///
/// # Errors
///
/// Returns an error if the filter is malformed or a subscriber is already set.
pub fn init_logging(config: &LoggingConfig, verbosity: u8) -> Result<(), TelemetryError> {
    let directives = filter_directives(config, verbosity);
    let env_filter = EnvFilter::try_new(&directives).map_err(|e| TelemetryError::Filter {
        filter: directives.clone(),
        reason: e.to_string(),
    })?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true),
            )
            .try_init(),
    };
    result.map_err(|e| TelemetryError::Init(e.to_string()))?;

    debug!(filter = %directives, format = ?config.format, "Logging initialized");
    Ok(())
}
