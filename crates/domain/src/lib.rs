//! Domain layer for ics-to-wiki
//!
//! Calendar events, link rules, recurrence descriptions and the errors they
//! can raise. Nothing in here performs I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
