//! Application layer - Use cases and orchestration
//!
//! Contains the event pipeline (filter, linker, renderer), the ports it
//! talks to and the service that runs it once.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
