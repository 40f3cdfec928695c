//! Application services
//!
//! The pure pipeline stages and the service that wires them to the ports.

mod event_filter;
mod keyword_linker;
mod table_renderer;
mod wiki_page_service;

pub use event_filter::EventFilter;
pub use keyword_linker::{KeywordLinker, apply_links};
pub use table_renderer::{
    DATE_FORMAT, RenderedRow, TABLE_CLOSE, TABLE_HEADER, TABLE_OPEN, TIME_FORMAT, TableRenderer,
    escape_wiki,
};
pub use wiki_page_service::{PageSettings, PublishTarget, RunMode, RunOutcome, WikiPageService};
