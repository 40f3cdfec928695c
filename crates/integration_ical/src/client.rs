//! iCalendar feed client
//!
//! Downloads the raw feed text over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// iCalendar client errors
#[derive(Debug, Error)]
pub enum IcsError {
    /// The HTTP client could not be built or the server was unreachable
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The server answered with an unexpected status or the body was unreadable
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The feed URL does not exist
    #[error("Feed not found: {0}")]
    NotFound(String),

    /// The server reported a temporary failure
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The feed is not valid iCalendar data
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl IcsError {
    /// Check if this error concerns the feed content rather than its transport
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError(_))
    }
}

/// Feed client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcsConfig {
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("ics-to-wiki/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for IcsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Client trait for downloading calendar feeds
#[async_trait]
pub trait IcsClient: Send + Sync {
    /// Download the feed at `url` and return its text
    async fn fetch_feed(&self, url: &str) -> Result<String, IcsError>;
}

/// reqwest-based feed client
#[derive(Debug)]
pub struct HttpIcsClient {
    client: Client,
    config: IcsConfig,
}

impl HttpIcsClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: IcsConfig) -> Result<Self, IcsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| IcsError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, IcsError> {
        Self::new(IcsConfig::default())
    }

    /// Get the configuration
    #[must_use]
    pub const fn config(&self) -> &IcsConfig {
        &self.config
    }
}

#[async_trait]
impl IcsClient for HttpIcsClient {
    #[instrument(skip(self))]
    async fn fetch_feed(&self, url: &str) -> Result<String, IcsError> {
        debug!("Fetching calendar feed");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| IcsError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(IcsError::NotFound(url.to_string()));
        }
        if status.is_server_error() {
            return Err(IcsError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(IcsError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| IcsError::RequestFailed(e.to_string()))?;

        debug!(bytes = body.len(), "Calendar feed received");
        Ok(body)
    }
}
