//! Event filter
//!
//! Selects the events that are still relevant at a given instant and puts
//! them into display order.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use domain::CalendarEvent;
use tracing::debug;

/// Selects and orders displayable events
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFilter;

impl EventFilter {
    /// Create a new filter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Keep events that have not ended before `now`, ordered by start time
    /// and then title
    ///
    /// Events without a start time are dropped. The input is left untouched.
    #[must_use]
    pub fn filter(&self, events: &[CalendarEvent], now: DateTime<Utc>) -> Vec<CalendarEvent> {
        let mut visible: Vec<CalendarEvent> = events
            .iter()
            .filter(|event| {
                if event.start.is_none() {
                    debug!(title = %event.title, "Dropping event without start time");
                    return false;
                }
                !event.is_over(now)
            })
            .cloned()
            .collect();

        visible.sort_by(display_order);
        visible
    }
}

/// Start instant ascending, then title (byte-wise, case-sensitive)
fn display_order(a: &CalendarEvent, b: &CalendarEvent) -> Ordering {
    let start_a = a.start.map(|dt| dt.with_timezone(&Utc));
    let start_b = b.start.map(|dt| dt.with_timezone(&Utc));
    start_a.cmp(&start_b).then_with(|| a.title.cmp(&b.title))
}
