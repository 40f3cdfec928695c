//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
///
/// Every variant is fatal for the run; nothing is retried.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Missing or malformed settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The calendar feed could not be retrieved
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The calendar feed could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Login or page edit failed
    #[error("Publish error: {0}")]
    Publish(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Process exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 2,
            Self::Fetch(_) => 3,
            Self::Parse(_) => 4,
            Self::Publish(_) => 5,
            Self::Domain(_) | Self::Internal(_) => 1,
        }
    }
}
