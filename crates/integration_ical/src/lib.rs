//! iCalendar integration
//!
//! Fetches `.ics` feeds over HTTP and turns them into domain events,
//! expanding recurring series to their next occurrence.

pub mod client;
pub mod feed;
mod recurrence;

pub use client::{HttpIcsClient, IcsClient, IcsConfig, IcsError};
pub use feed::{FeedParser, IcsTime};
