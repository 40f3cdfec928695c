//! Recurring series expansion
//!
//! Occurrences come from the `rrule` crate; `EXDATE`, `RDATE` and moved
//! instances are applied here so that date-only and zoned values compare
//! the same way everywhere.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rrule::RRuleSet;

use crate::{client::IcsError, feed::IcsTime};

/// A recurring `VEVENT` ready for expansion
#[derive(Debug)]
pub(crate) struct Series<'a> {
    /// First start (`DTSTART`)
    pub start: DateTime<Tz>,
    /// Length of every occurrence
    pub duration: Duration,
    /// Raw `RRULE` value
    pub rrule: &'a str,
    /// `EXDATE` values and `RECURRENCE-ID`s of moved instances
    pub exclusions: &'a [IcsTime],
    /// Extra starts (`RDATE`)
    pub rdates: &'a [DateTime<Tz>],
}

impl Series<'_> {
    /// The earliest occurrence that has not ended at `now`
    pub fn next_occurrence(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Tz>>, IcsError> {
        let rule_set = RRuleSet::from_str(&self.rule_text()).map_err(|e| {
            IcsError::ParseError(format!("invalid RRULE '{}': {e}", self.rrule))
        })?;

        let zone = self.start.timezone();
        // an end past the representable range never lies before `now`
        let is_upcoming = |start: &DateTime<Tz>| {
            start
                .checked_add_signed(self.duration)
                .is_none_or(|end| end.with_timezone(&Utc) >= now)
                && !self.exclusions.iter().any(|excluded| excluded.matches(start))
        };

        let from_rule = rule_set
            .into_iter()
            .map(|occurrence| occurrence.with_timezone(&zone))
            .find(|start| is_upcoming(start));

        let from_rdates = self
            .rdates
            .iter()
            .copied()
            .filter(|start| is_upcoming(start))
            .min();

        Ok(from_rule.into_iter().chain(from_rdates).min())
    }

    /// `DTSTART` and `RRULE` lines in the form `RRuleSet` parses
    fn rule_text(&self) -> String {
        let dtstart = if self.start.timezone() == Tz::UTC {
            format!("DTSTART:{}", self.start.format("%Y%m%dT%H%M%SZ"))
        } else {
            format!(
                "DTSTART;TZID={}:{}",
                self.start.timezone().name(),
                self.start.format("%Y%m%dT%H%M%S")
            )
        };
        format!(
            "{dtstart}\nRRULE:{}\n",
            normalize_until(self.rrule, self.start.timezone())
        )
    }
}

/// Strip an `RRULE:` prefix and make `UNTIL` a UTC date-time
///
/// `DTSTART` is always a date-time here, and `UNTIL` has to match it.
/// Floating and date-only values are wall-clock times in `zone`.
fn normalize_until(rrule: &str, zone: Tz) -> String {
    let trimmed = rrule.trim();
    let body = trimmed
        .get(..6)
        .filter(|prefix| prefix.eq_ignore_ascii_case("RRULE:"))
        .map_or(trimmed, |_| &trimmed[6..]);

    body.split(';')
        .map(|part| match part.split_once('=') {
            Some((key, value)) if key.trim().eq_ignore_ascii_case("UNTIL") => {
                let value = value.trim();
                if value.ends_with('Z') {
                    return format!("UNTIL={value}");
                }
                local_until(value, zone).map_or_else(
                    || format!("UNTIL={value}"),
                    |until| format!("UNTIL={}", until.format("%Y%m%dT%H%M%SZ")),
                )
            },
            _ => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// A local `UNTIL` (date or floating date-time) as a UTC instant
fn local_until(value: &str, zone: Tz) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").ok().or_else(|| {
        NaiveDate::parse_from_str(value, "%Y%m%d")
            .ok()
            .and_then(|date| date.and_hms_opt(23, 59, 59))
    })?;
    zone.from_local_datetime(&naive)
        .latest()
        .map(|until| until.with_timezone(&Utc))
}
