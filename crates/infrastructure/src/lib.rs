//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the iCalendar and MediaWiki
//! integrations, and owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod service_factory;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, CalendarConfig, ConfigError, HttpConfig, LinkEntry, LogFormat, LoggingConfig,
    WikiConfig,
};
pub use service_factory::wiki_page_service;
pub use telemetry::{TelemetryError, init_logging};
