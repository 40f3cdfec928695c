//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod ics_calendar_adapter;
mod mediawiki_adapter;

pub use ics_calendar_adapter::IcsCalendarAdapter;
pub use mediawiki_adapter::MediaWikiAdapter;
