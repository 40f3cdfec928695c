//! Parsed iCalendar recurrence rule (RRULE)
//!
//! Only the parts needed to describe a series to a reader are modelled.
//! Expansion into concrete occurrences happens in the iCalendar integration.

use std::{fmt, str::FromStr};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Recurrence frequency (FREQ)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl FromStr for Frequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SECONDLY" => Ok(Self::Secondly),
            "MINUTELY" => Ok(Self::Minutely),
            "HOURLY" => Ok(Self::Hourly),
            "DAILY" => Ok(Self::Daily),
            "WEEKLY" => Ok(Self::Weekly),
            "MONTHLY" => Ok(Self::Monthly),
            "YEARLY" => Ok(Self::Yearly),
            other => Err(DomainError::InvalidRecurrenceRule(format!(
                "unknown FREQ '{other}'"
            ))),
        }
    }
}

/// One BYDAY entry, e.g. `MO`, `1TU` or `-1FR`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekdayNum {
    /// Position within the month/year, if given
    pub ordinal: Option<i8>,
    /// The weekday
    pub weekday: Weekday,
}

impl FromStr for WeekdayNum {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() < 2 || !s.is_char_boundary(s.len() - 2) {
            return Err(DomainError::InvalidRecurrenceRule(format!(
                "invalid BYDAY entry '{s}'"
            )));
        }
        let (prefix, code) = s.split_at(s.len() - 2);
        let weekday = match code.to_uppercase().as_str() {
            "MO" => Weekday::Mon,
            "TU" => Weekday::Tue,
            "WE" => Weekday::Wed,
            "TH" => Weekday::Thu,
            "FR" => Weekday::Fri,
            "SA" => Weekday::Sat,
            "SU" => Weekday::Sun,
            _ => {
                return Err(DomainError::InvalidRecurrenceRule(format!(
                    "invalid weekday in BYDAY entry '{s}'"
                )));
            },
        };
        let ordinal = if prefix.is_empty() {
            None
        } else {
            Some(prefix.trim_start_matches('+').parse::<i8>().map_err(|_| {
                DomainError::InvalidRecurrenceRule(format!("invalid ordinal in BYDAY entry '{s}'"))
            })?)
        };
        Ok(Self { ordinal, weekday })
    }
}

/// A recurrence rule as found in an `RRULE` property value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// FREQ
    pub frequency: Frequency,
    /// INTERVAL (defaults to 1)
    pub interval: u32,
    /// BYDAY entries in rule order
    pub by_day: Vec<WeekdayNum>,
    /// BYSETPOS entries
    pub by_set_pos: Vec<i32>,
    /// BYMONTHDAY entries
    pub by_month_day: Vec<i32>,
    /// The raw value, kept for expansion
    raw: String,
}

impl RecurrenceRule {
    /// Parse an RRULE value such as `FREQ=WEEKLY;BYDAY=MO,WE`
    ///
    /// A leading `RRULE:` is tolerated. Unknown parts are ignored.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        let body = trimmed
            .get(..6)
            .filter(|p| p.eq_ignore_ascii_case("RRULE:"))
            .map_or(trimmed, |_| &trimmed[6..]);

        let mut frequency = None;
        let mut interval = 1;
        let mut by_day = Vec::new();
        let mut by_set_pos = Vec::new();
        let mut by_month_day = Vec::new();

        for part in body.split(';') {
            let Some((key, val)) = part.split_once('=') else {
                continue;
            };
            let val = val.trim();
            match key.trim().to_uppercase().as_str() {
                "FREQ" => frequency = Some(val.parse::<Frequency>()?),
                "INTERVAL" => {
                    interval = val.parse::<u32>().map_err(|_| {
                        DomainError::InvalidRecurrenceRule(format!("invalid INTERVAL '{val}'"))
                    })?;
                },
                "BYDAY" => by_day = parse_list(val, str::parse::<WeekdayNum>)?,
                "BYSETPOS" => by_set_pos = parse_list(val, parse_int)?,
                "BYMONTHDAY" => by_month_day = parse_list(val, parse_int)?,
                _ => {},
            }
        }

        let frequency = frequency
            .ok_or_else(|| DomainError::InvalidRecurrenceRule(format!("FREQ missing in '{body}'")))?;

        Ok(Self {
            frequency,
            interval: interval.max(1),
            by_day,
            by_set_pos,
            by_month_day,
            raw: body.to_string(),
        })
    }

    /// The rule text without the `RRULE:` prefix
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// German description of the series, e.g. `jeden ersten Montag im Monat`
    #[must_use]
    pub fn describe(&self) -> String {
        let interval = self.interval;
        match self.frequency {
            Frequency::Daily if interval == 1 => "täglich".to_string(),
            Frequency::Daily => format!("alle {interval} Tage"),
            Frequency::Weekly => self.describe_weekly(),
            Frequency::Monthly => self.describe_monthly(),
            Frequency::Yearly if interval == 1 => "jedes Jahr".to_string(),
            Frequency::Yearly => format!("alle {interval} Jahre"),
            _ => "wiederkehrend".to_string(),
        }
    }

    fn describe_weekly(&self) -> String {
        let days: Vec<&str> = self.by_day.iter().map(|d| weekday_name(d.weekday)).collect();
        match (self.interval, days.as_slice()) {
            (1, []) => "jede Woche".to_string(),
            (1, [day]) => format!("jeden {day}"),
            (1, _) => format!("jede Woche am {}", join_german(&days)),
            (n, []) => format!("alle {n} Wochen"),
            (n, _) => format!("alle {n} Wochen am {}", join_german(&days)),
        }
    }

    fn describe_monthly(&self) -> String {
        if let [day] = self.by_day.as_slice() {
            let position = match self.by_set_pos.as_slice() {
                [pos] => Some(*pos),
                [] => day.ordinal.map(i32::from),
                _ => None,
            };
            if let Some(ordinal) = position.and_then(ordinal_name) {
                return format!("jeden {ordinal} {} im Monat", weekday_name(day.weekday));
            }
        }

        if let [month_day] = self.by_month_day.as_slice() {
            return format!("jeden {month_day}. im Monat");
        }

        if self.interval == 1 {
            "jeden Monat".to_string()
        } else {
            format!("alle {} Monate", self.interval)
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn parse_list<T>(
    value: &str,
    parse: impl Fn(&str) -> Result<T, DomainError>,
) -> Result<Vec<T>, DomainError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(parse)
        .collect()
}

fn parse_int(value: &str) -> Result<i32, DomainError> {
    value
        .trim_start_matches('+')
        .parse::<i32>()
        .map_err(|_| DomainError::InvalidRecurrenceRule(format!("invalid number '{value}'")))
}

const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Montag",
        Weekday::Tue => "Dienstag",
        Weekday::Wed => "Mittwoch",
        Weekday::Thu => "Donnerstag",
        Weekday::Fri => "Freitag",
        Weekday::Sat => "Samstag",
        Weekday::Sun => "Sonntag",
    }
}

const fn ordinal_name(position: i32) -> Option<&'static str> {
    match position {
        1 => Some("ersten"),
        2 => Some("zweiten"),
        3 => Some("dritten"),
        4 => Some("vierten"),
        -1 => Some("letzten"),
        _ => None,
    }
}

/// `a`, `a und b`, `a, b und c`
fn join_german(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} und {last}", init.join(", ")),
    }
}
