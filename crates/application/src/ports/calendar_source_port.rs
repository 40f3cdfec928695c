//! Calendar source port
//!
//! Defines how the pipeline obtains events from a remote calendar feed.

use async_trait::async_trait;
use domain::CalendarEvent;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for retrieving and parsing a calendar feed
///
/// Implementations return one event per single event, per moved occurrence
/// and per recurring series (its next occurrence). Network failures map to
/// [`ApplicationError::Fetch`], malformed data to [`ApplicationError::Parse`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CalendarSourcePort: Send + Sync {
    /// Fetch the feed at `url` and parse it into events
    async fn fetch(&self, url: &str) -> Result<Vec<CalendarEvent>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn CalendarSourcePort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn CalendarSourcePort>();
    }
}
