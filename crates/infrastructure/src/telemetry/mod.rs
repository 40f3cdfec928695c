//! Logging setup
//!
//! Installs the global `tracing` subscriber. Logs go to stderr so rendered
//! wikitext on stdout stays clean.

mod logging;

pub use logging::{TelemetryError, filter_directives, init_logging};
