//! Calendar event entity - one displayable event as read from a feed

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::value_objects::{EventLink, RecurrenceRule};

/// How an event relates to a recurring series
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Occurrence {
    /// A one-off event
    #[default]
    Single,
    /// The next occurrence of a recurring series
    Recurring { rule: RecurrenceRule },
    /// One instance of a series that was moved (RECURRENCE-ID override)
    Moved { series_rule: Option<RecurrenceRule> },
}

impl Occurrence {
    /// Short note shown next to the date, if any
    #[must_use]
    pub fn note(&self) -> Option<String> {
        match self {
            Self::Single => None,
            Self::Recurring { rule } => Some(rule.describe()),
            Self::Moved {
                series_rule: Some(rule),
            } => Some(format!("verschoben, sonst {}", rule.describe())),
            Self::Moved { series_rule: None } => Some("verschoben".to_string()),
        }
    }
}

/// An event as produced by a calendar source
///
/// Times keep the zone they were read in; comparisons between events are
/// by instant. Only serialized; `chrono_tz` times have no `Deserialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    /// iCalendar UID, if present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Event title (SUMMARY)
    pub title: String,
    /// Start time; events without one are never displayed
    pub start: Option<DateTime<Tz>>,
    /// End time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Tz>>,
    /// Free-form location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the event spans whole days (DTSTART;VALUE=DATE)
    pub all_day: bool,
    /// Relation to a recurring series
    pub occurrence: Occurrence,
}

impl CalendarEvent {
    /// Create an event with a title and start time
    #[must_use]
    pub fn new(title: impl Into<String>, start: DateTime<Tz>) -> Self {
        Self {
            start: Some(start),
            ..Self::untimed(title)
        }
    }

    /// Create an event without a start time
    #[must_use]
    pub fn untimed(title: impl Into<String>) -> Self {
        Self {
            uid: None,
            title: title.into(),
            start: None,
            end: None,
            location: None,
            description: None,
            all_day: false,
            occurrence: Occurrence::Single,
        }
    }

    /// Set the UID
    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Set the end time
    #[must_use]
    pub const fn with_end(mut self, end: DateTime<Tz>) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the location
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark as all-day event
    #[must_use]
    pub const fn as_all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    /// Set the relation to a recurring series
    #[must_use]
    pub fn with_occurrence(mut self, occurrence: Occurrence) -> Self {
        self.occurrence = occurrence;
        self
    }

    /// The instant after which the event is over: its end, or its start
    /// when it has no end
    #[must_use]
    pub fn effective_end(&self) -> Option<DateTime<Utc>> {
        self.end
            .as_ref()
            .or(self.start.as_ref())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Whether the event ended strictly before `now`
    ///
    /// Events without any time are not considered over; they are rejected
    /// for lacking a start instead.
    #[must_use]
    pub fn is_over(&self, now: DateTime<Utc>) -> bool {
        self.effective_end().is_some_and(|end| end < now)
    }

    /// Link embedded in the first description line, if any
    #[must_use]
    pub fn link(&self) -> Option<EventLink> {
        self.description
            .as_deref()
            .and_then(EventLink::from_description)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn berlin(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        Tz::Europe__Berlin
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
    }

    #[test]
    fn builder_pattern() {
        let event = CalendarEvent::new("Plenum", berlin(2025, 5, 1, 19, 0))
            .with_uid("abc")
            .with_end(berlin(2025, 5, 1, 21, 0))
            .with_location("Gewölbe")
            .with_description("[[Plenum]]");

        assert_eq!(event.uid.as_deref(), Some("abc"));
        assert_eq!(event.location.as_deref(), Some("Gewölbe"));
        assert!(!event.all_day);
        assert_eq!(event.occurrence, Occurrence::Single);
        assert!(event.link().is_some());
    }

    #[test]
    fn effective_end_prefers_end() {
        let event = CalendarEvent::new("x", berlin(2025, 5, 1, 19, 0))
            .with_end(berlin(2025, 5, 1, 21, 0));
        assert_eq!(
            event.effective_end().unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 1, 19, 0, 0).unwrap()
        );
    }

    #[test]
    fn effective_end_falls_back_to_start() {
        let event = CalendarEvent::new("x", berlin(2025, 5, 1, 19, 0));
        assert_eq!(
            event.effective_end().unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 1, 17, 0, 0).unwrap()
        );
    }

    #[test]
    fn is_over_is_strict() {
        let event = CalendarEvent::new("x", berlin(2025, 5, 1, 19, 0));
        let at_start = Utc.with_ymd_and_hms(2025, 5, 1, 17, 0, 0).unwrap();
        assert!(!event.is_over(at_start));
        assert!(event.is_over(at_start + chrono::Duration::seconds(1)));
    }

    #[test]
    fn untimed_event_is_never_over() {
        assert!(!CalendarEvent::untimed("x").is_over(Utc::now()));
    }

    #[test]
    fn serializes_with_zoned_times() {
        let event = CalendarEvent::new("Plenum", berlin(2025, 5, 1, 19, 0))
            .with_end(berlin(2025, 5, 1, 21, 0));
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["title"], "Plenum");
        assert!(json["start"].as_str().unwrap().starts_with("2025-05-01T19:00:00"));
        assert_eq!(json["occurrence"]["kind"], "single");
        assert!(json.get("location").is_none());
    }

    #[test]
    fn occurrence_notes() {
        let rule = RecurrenceRule::parse("FREQ=WEEKLY;BYDAY=TU").unwrap();
        assert_eq!(Occurrence::Single.note(), None);
        assert_eq!(
            Occurrence::Recurring { rule: rule.clone() }.note().unwrap(),
            "jeden Dienstag"
        );
        assert_eq!(
            Occurrence::Moved {
                series_rule: Some(rule)
            }
            .note()
            .unwrap(),
            "verschoben, sonst jeden Dienstag"
        );
        assert_eq!(
            Occurrence::Moved { series_rule: None }.note().unwrap(),
            "verschoben"
        );
    }
}
