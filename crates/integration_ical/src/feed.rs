//! iCalendar feed parsing
//!
//! Walks every `VEVENT` in a feed (nested ones included) and turns it into a
//! [`CalendarEvent`]. Recurring series collapse to their next occurrence,
//! moved occurrences (`RECURRENCE-ID`) become events of their own.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use domain::{CalendarEvent, Occurrence, RecurrenceRule, Timezone};
use icalendar::parser;
use tracing::{debug, instrument, warn};

use crate::{client::IcsError, recurrence::Series};

const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";
const DATE_FORMAT: &str = "%Y%m%d";

/// A `DATE` or `DATE-TIME` property value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcsTime {
    /// `VALUE=DATE`
    Date(NaiveDate),
    /// A resolved date-time (UTC, `TZID` or floating)
    DateTime(DateTime<Tz>),
}

impl IcsTime {
    /// Parse a single value
    ///
    /// `tzid` is the `TZID` parameter, if any. Floating values and values
    /// with an unknown `TZID` are resolved in `default_tz`.
    pub fn parse(
        value: &str,
        tzid: Option<&str>,
        is_date: bool,
        default_tz: Timezone,
    ) -> Result<Self, IcsError> {
        let value = value.trim();

        if is_date || (value.len() == 8 && !value.contains('T')) {
            return NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map(Self::Date)
                .map_err(|e| IcsError::ParseError(format!("invalid date '{value}': {e}")));
        }

        if value.ends_with('Z') {
            let naive = NaiveDateTime::parse_from_str(value, UTC_FORMAT)
                .map_err(|e| IcsError::ParseError(format!("invalid date-time '{value}': {e}")))?;
            return Ok(Self::DateTime(naive.and_utc().with_timezone(&Tz::UTC)));
        }

        let naive = NaiveDateTime::parse_from_str(value, LOCAL_FORMAT)
            .map_err(|e| IcsError::ParseError(format!("invalid date-time '{value}': {e}")))?;

        let zone = match tzid {
            Some(name) => Timezone::parse(name).unwrap_or_else(|_| {
                warn!(tzid = name, fallback = %default_tz, "Unknown TZID, using default timezone");
                default_tz
            }),
            None => default_tz,
        };

        localize(zone, naive).map(Self::DateTime)
    }

    /// Check if this is a date without time
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// The instant this value denotes; dates start at midnight in `default_tz`
    pub fn to_datetime(self, default_tz: Timezone) -> Result<DateTime<Tz>, IcsError> {
        match self {
            Self::Date(date) => localize(default_tz, date.and_time(NaiveTime::MIN)),
            Self::DateTime(dt) => Ok(dt),
        }
    }

    /// Whether this value names the occurrence starting at `start`
    ///
    /// Dates match any occurrence on that day, date-times the exact instant.
    #[must_use]
    pub fn matches(&self, start: &DateTime<Tz>) -> bool {
        match self {
            Self::Date(date) => start.date_naive() == *date,
            Self::DateTime(dt) => dt.with_timezone(&Utc) == start.with_timezone(&Utc),
        }
    }
}

/// Resolve a wall-clock time, moving times in a DST gap forward by an hour
fn localize(zone: Timezone, naive: NaiveDateTime) -> Result<DateTime<Tz>, IcsError> {
    zone.localize(naive)
        .or_else(|e| match naive.checked_add_signed(Duration::hours(1)) {
            Some(shifted) => zone.localize(shifted),
            None => Err(e),
        })
        .map_err(|e| IcsError::ParseError(e.to_string()))
}

/// `time + by`, failing instead of overflowing the representable range
fn shift(time: DateTime<Tz>, by: Duration) -> Result<DateTime<Tz>, IcsError> {
    time.checked_add_signed(by)
        .ok_or_else(|| IcsError::ParseError(format!("{time} + {by} is out of range")))
}

/// One property with its parameters, detached from the parser's borrows
#[derive(Debug, Clone)]
struct RawProperty {
    name: String,
    value: String,
    params: Vec<(String, String)>,
}

impl RawProperty {
    fn from_parsed(property: &parser::Property<'_>) -> Self {
        Self {
            name: property.name.as_str().to_ascii_uppercase(),
            value: property.val.as_str().to_string(),
            params: property
                .params
                .iter()
                .map(|param| {
                    let value = param
                        .val
                        .as_ref()
                        .map(|v| v.as_str().trim_matches('"').to_string())
                        .unwrap_or_default();
                    (param.key.as_str().to_ascii_uppercase(), value)
                })
                .collect(),
        }
    }

    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn is_date(&self) -> bool {
        self.param("VALUE")
            .is_some_and(|v| v.eq_ignore_ascii_case("DATE"))
    }

    fn time(&self, default_tz: Timezone) -> Result<IcsTime, IcsError> {
        IcsTime::parse(&self.value, self.param("TZID"), self.is_date(), default_tz)
    }

    /// Comma-separated list values (EXDATE, RDATE)
    fn times(&self, default_tz: Timezone) -> Result<Vec<IcsTime>, IcsError> {
        if self
            .param("VALUE")
            .is_some_and(|v| v.eq_ignore_ascii_case("PERIOD"))
        {
            warn!(property = %self.name, "PERIOD values are not supported, ignoring");
            return Ok(Vec::new());
        }
        self.value
            .split(',')
            .filter(|v| !v.trim().is_empty())
            .map(|v| IcsTime::parse(v, self.param("TZID"), self.is_date(), default_tz))
            .collect()
    }
}

/// A `VEVENT` reduced to the properties the pipeline uses
#[derive(Debug, Clone, Default)]
struct VEvent {
    uid: Option<String>,
    summary: Option<String>,
    location: Option<String>,
    description: Option<String>,
    start: Option<IcsTime>,
    end: Option<IcsTime>,
    duration: Option<Duration>,
    rrule: Option<String>,
    exdates: Vec<IcsTime>,
    rdates: Vec<IcsTime>,
    recurrence_id: Option<IcsTime>,
}

impl VEvent {
    fn from_component(
        component: &parser::Component<'_>,
        default_tz: Timezone,
    ) -> Result<Self, IcsError> {
        let mut event = Self::default();

        for property in component.properties.iter().map(RawProperty::from_parsed) {
            match property.name.as_str() {
                "UID" => event.uid = non_empty(&property.value),
                "SUMMARY" => event.summary = non_empty(&unescape_text(&property.value)),
                "LOCATION" => event.location = non_empty(&unescape_text(&property.value)),
                "DESCRIPTION" => {
                    event.description = non_empty(&unescape_text(&property.value));
                },
                "DTSTART" => event.start = Some(property.time(default_tz)?),
                "DTEND" => event.end = Some(property.time(default_tz)?),
                "DURATION" => {
                    event.duration = Some(parse_duration(&property.value).ok_or_else(|| {
                        IcsError::ParseError(format!("invalid DURATION '{}'", property.value))
                    })?);
                },
                "RRULE" => event.rrule = non_empty(&property.value),
                "EXDATE" => event.exdates.extend(property.times(default_tz)?),
                "RDATE" => event.rdates.extend(property.times(default_tz)?),
                "RECURRENCE-ID" => event.recurrence_id = Some(property.time(default_tz)?),
                _ => {},
            }
        }

        Ok(event)
    }

    fn is_all_day(&self) -> bool {
        self.start.as_ref().is_some_and(IcsTime::is_date)
    }

    /// Resolved start and end
    ///
    /// Without `DTEND`, the end is start plus `DURATION`, one day for
    /// all-day events, or absent.
    fn span(
        &self,
        default_tz: Timezone,
    ) -> Result<(Option<DateTime<Tz>>, Option<DateTime<Tz>>), IcsError> {
        let start = self
            .start
            .or(self.recurrence_id)
            .map(|t| t.to_datetime(default_tz))
            .transpose()?;

        let end = match (self.end, start, self.duration) {
            (Some(end), _, _) => Some(end.to_datetime(default_tz)?),
            (None, Some(start), Some(duration)) => Some(shift(start, duration)?),
            (None, Some(start), None) if self.is_all_day() => {
                Some(shift(start, Duration::days(1))?)
            },
            _ => None,
        };

        Ok((start, end))
    }

    fn to_event(
        &self,
        start: Option<DateTime<Tz>>,
        end: Option<DateTime<Tz>>,
        occurrence: Occurrence,
    ) -> CalendarEvent {
        let title = self.summary.clone().unwrap_or_default();
        let mut event = match start {
            Some(start) => CalendarEvent::new(title, start),
            None => CalendarEvent::untimed(title),
        };
        event.end = end;
        event.uid.clone_from(&self.uid);
        event.location.clone_from(&self.location);
        event.description.clone_from(&self.description);
        event.all_day = self.is_all_day();
        event.with_occurrence(occurrence)
    }
}

/// Turns feed text into events
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedParser {
    timezone: Timezone,
}

impl FeedParser {
    /// Create a parser resolving floating times in `timezone`
    #[must_use]
    pub const fn new(timezone: Timezone) -> Self {
        Self { timezone }
    }

    /// Timezone used for floating times and dates
    #[must_use]
    pub const fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Parse a feed, expanding recurring series relative to `now`
    ///
    /// Series without a remaining occurrence are dropped. Events without a
    /// start are kept so the caller can decide what to do with them.
    #[instrument(skip(self, ics), fields(bytes = ics.len()))]
    pub fn parse(&self, ics: &str, now: DateTime<Utc>) -> Result<Vec<CalendarEvent>, IcsError> {
        let unfolded = parser::unfold(ics);
        if !unfolded.to_ascii_uppercase().contains("BEGIN:VCALENDAR") {
            return Err(IcsError::ParseError(
                "not an iCalendar document (no BEGIN:VCALENDAR)".to_string(),
            ));
        }

        let parsed = parser::read_calendar(&unfolded)
            .map_err(|e| IcsError::ParseError(format!("iCalendar parse error: {e}")))?;

        let mut vevents = Vec::new();
        collect_vevents(&parsed.components, self.timezone, &mut vevents)?;
        debug!(count = vevents.len(), "Parsed VEVENT components");

        self.build_events(&vevents, now)
    }

    fn build_events(
        &self,
        vevents: &[VEvent],
        now: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, IcsError> {
        let mut series_rules: HashMap<&str, &str> = HashMap::new();
        let mut moved: HashMap<&str, Vec<IcsTime>> = HashMap::new();

        for vevent in vevents {
            let Some(uid) = vevent.uid.as_deref() else {
                continue;
            };
            match (vevent.recurrence_id, vevent.rrule.as_deref()) {
                (Some(recurrence_id), _) => moved.entry(uid).or_default().push(recurrence_id),
                (None, Some(rrule)) => {
                    series_rules.insert(uid, rrule);
                },
                (None, None) => {},
            }
        }

        let mut events = Vec::with_capacity(vevents.len());

        for vevent in vevents {
            let (start, end) = vevent.span(self.timezone)?;

            if vevent.recurrence_id.is_some() {
                let series_rule = vevent
                    .uid
                    .as_deref()
                    .and_then(|uid| series_rules.get(uid))
                    .map(|rule| parse_rule(rule))
                    .transpose()?;
                events.push(vevent.to_event(start, end, Occurrence::Moved { series_rule }));
                continue;
            }

            let (Some(rrule), Some(series_start)) = (vevent.rrule.as_deref(), start) else {
                events.push(vevent.to_event(start, end, Occurrence::Single));
                continue;
            };

            let rule = parse_rule(rrule)?;
            let duration = end.map_or_else(Duration::zero, |end| end - series_start);
            let mut exclusions = vevent.exdates.clone();
            if let Some(overridden) = vevent.uid.as_deref().and_then(|uid| moved.get(uid)) {
                exclusions.extend(overridden.iter().copied());
            }
            let rdates = vevent
                .rdates
                .iter()
                .map(|t| t.to_datetime(self.timezone))
                .collect::<Result<Vec<_>, _>>()?;

            let series = Series {
                start: series_start,
                duration,
                rrule,
                exclusions: &exclusions,
                rdates: &rdates,
            };

            match series.next_occurrence(now)? {
                Some(next) => {
                    let next_end = end.map(|_| shift(next, duration)).transpose()?;
                    events.push(vevent.to_event(
                        Some(next),
                        next_end,
                        Occurrence::Recurring { rule },
                    ));
                },
                None => debug!(
                    title = vevent.summary.as_deref().unwrap_or_default(),
                    "Recurring series has no remaining occurrence"
                ),
            }
        }

        Ok(events)
    }
}

fn collect_vevents(
    components: &[parser::Component<'_>],
    default_tz: Timezone,
    out: &mut Vec<VEvent>,
) -> Result<(), IcsError> {
    for component in components {
        if component.name.as_str().eq_ignore_ascii_case("VEVENT") {
            out.push(VEvent::from_component(component, default_tz)?);
        }
        collect_vevents(&component.components, default_tz, out)?;
    }
    Ok(())
}

fn parse_rule(rrule: &str) -> Result<RecurrenceRule, IcsError> {
    RecurrenceRule::parse(rrule).map_err(|e| IcsError::ParseError(e.to_string()))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Undo TEXT escaping: `\n`, `\N`, `\,`, `\;` and `\\`
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Parse a DURATION value such as `PT1H30M`, `P1D` or `-PT15M`
fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (negative, rest) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let rest = rest.strip_prefix('P')?;

    let mut total = Duration::zero();
    let mut number = String::new();
    let mut in_time = false;
    let mut seen_unit = false;

    for c in rest.chars() {
        match c {
            '0'..='9' => number.push(c),
            'T' if !in_time && number.is_empty() => in_time = true,
            unit => {
                let n: i64 = number.parse().ok()?;
                number.clear();
                seen_unit = true;
                let part = match (unit, in_time) {
                    ('W', false) => Duration::try_weeks(n),
                    ('D', false) => Duration::try_days(n),
                    ('H', true) => Duration::try_hours(n),
                    ('M', true) => Duration::try_minutes(n),
                    ('S', true) => Duration::try_seconds(n),
                    _ => None,
                }?;
                total = total.checked_add(&part)?;
            },
        }
    }

    if !number.is_empty() || !seen_unit {
        return None;
    }
    Some(if negative { -total } else { total })
}
