//! Timezone value object

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A validated IANA timezone
///
/// Used both for displaying event times and for interpreting floating
/// iCalendar date-times that carry neither `Z` nor `TZID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timezone(Tz);

impl Timezone {
    /// Wrap a `chrono_tz` timezone
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Parse an IANA timezone name such as `Europe/Berlin`
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        Tz::from_str(name.trim())
            .map(Self)
            .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
    }

    /// Get the underlying timezone
    #[must_use]
    pub const fn tz(&self) -> Tz {
        self.0
    }

    /// Get the IANA name
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Resolve a local wall-clock time in this timezone
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant,
    /// non-existent times (DST spring-forward) are rejected.
    pub fn localize(&self, naive: NaiveDateTime) -> Result<DateTime<Tz>, DomainError> {
        self.0
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| {
                DomainError::InvalidDateTime(format!("{naive} does not exist in {}", self.name()))
            })
    }

    /// Europe/Berlin timezone
    #[must_use]
    pub const fn berlin() -> Self {
        Self(Tz::Europe__Berlin)
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self::berlin()
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<String> for Timezone {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Timezone> for String {
    fn from(tz: Timezone) -> Self {
        tz.name().to_string()
    }
}

impl FromStr for Timezone {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
