//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod calendar_source_port;
mod wiki_publisher_port;

pub use calendar_source_port::CalendarSourcePort;
#[cfg(test)]
pub use calendar_source_port::MockCalendarSourcePort;
pub use wiki_publisher_port::WikiPublisherPort;
#[cfg(test)]
pub use wiki_publisher_port::MockWikiPublisherPort;
