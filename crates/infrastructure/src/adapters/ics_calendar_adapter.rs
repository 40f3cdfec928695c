//! iCalendar adapter - Implements `CalendarSourcePort` using integration_ical

use std::sync::Arc;

use application::{error::ApplicationError, ports::CalendarSourcePort};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{CalendarEvent, Timezone};
use integration_ical::{FeedParser, HttpIcsClient, IcsClient, IcsConfig, IcsError};
use tracing::{debug, instrument};

/// Adapter reading events from an iCalendar feed over HTTP
///
/// Recurring series are expanded relative to a reference time: the fixed
/// one if set, otherwise the clock at fetch time.
pub struct IcsCalendarAdapter {
    client: Arc<dyn IcsClient>,
    parser: FeedParser,
    reference_time: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for IcsCalendarAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IcsCalendarAdapter")
            .field("timezone", &self.parser.timezone())
            .field("reference_time", &self.reference_time)
            .finish_non_exhaustive()
    }
}

impl IcsCalendarAdapter {
    /// Create an adapter with an HTTP client built from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: IcsConfig, timezone: Timezone) -> Result<Self, ApplicationError> {
        let client = HttpIcsClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self::with_client(Arc::new(client), timezone))
    }

    /// Create an adapter around an existing client
    pub fn with_client(client: Arc<dyn IcsClient>, timezone: Timezone) -> Self {
        Self {
            client,
            parser: FeedParser::new(timezone),
            reference_time: None,
        }
    }

    /// Expand recurring series relative to `now` instead of the clock
    #[must_use]
    pub const fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.reference_time = Some(now);
        self
    }

    /// Map integration feed error to application error
    fn map_error(err: IcsError) -> ApplicationError {
        match err {
            IcsError::ParseError(e) => ApplicationError::Parse(e),
            IcsError::NotFound(url) => ApplicationError::Fetch(format!("feed not found: {url}")),
            other => ApplicationError::Fetch(other.to_string()),
        }
    }
}

#[async_trait]
impl CalendarSourcePort for IcsCalendarAdapter {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<CalendarEvent>, ApplicationError> {
        let text = self.client.fetch_feed(url).await.map_err(Self::map_error)?;
        debug!(bytes = text.len(), "Downloaded feed");

        let now = self.reference_time.unwrap_or_else(Utc::now);
        self.parser.parse(&text, now).map_err(Self::map_error)
    }
}
