//! Domain entities

mod calendar_event;
mod page_content;

pub use calendar_event::{CalendarEvent, Occurrence};
pub use page_content::PageContent;
