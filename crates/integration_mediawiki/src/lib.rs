//! MediaWiki integration
//!
//! Client for the MediaWiki Action API (`api.php`): bot login and
//! full-page replace edits within one cookie-keeping session.

pub mod client;
mod models;

pub use client::{EditOutcome, MediaWikiClient, MediaWikiConfig, MediaWikiError, WikiClient};
pub use models::{ApiError, EditResponse, EditResult, LoginResponse, LoginResult, TokenResponse};
