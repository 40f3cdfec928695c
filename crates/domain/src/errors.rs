//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Link rule with an unusable keyword or malformed pair
    #[error("Invalid link rule: {0}")]
    InvalidLinkRule(String),

    /// RRULE value that cannot be understood
    #[error("Invalid recurrence rule: {0}")]
    InvalidRecurrenceRule(String),

    /// Unknown IANA timezone name
    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    /// Date/time parsing error
    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),
}

impl DomainError {
    /// Create an invalid link rule error
    pub fn invalid_link_rule(reason: impl Into<String>) -> Self {
        Self::InvalidLinkRule(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_link_rule_message() {
        let err = DomainError::invalid_link_rule("keyword must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid link rule: keyword must not be empty"
        );
    }

    #[test]
    fn invalid_recurrence_rule_message() {
        let err = DomainError::InvalidRecurrenceRule("FREQ missing".to_string());
        assert_eq!(err.to_string(), "Invalid recurrence rule: FREQ missing");
    }

    #[test]
    fn invalid_timezone_message() {
        let err = DomainError::InvalidTimezone("Mars/Olympus".to_string());
        assert_eq!(err.to_string(), "Unknown timezone: Mars/Olympus");
    }

    #[test]
    fn invalid_datetime_error_message() {
        let err = DomainError::InvalidDateTime("not a date".to_string());
        assert_eq!(err.to_string(), "Invalid date/time: not a date");
    }
}
