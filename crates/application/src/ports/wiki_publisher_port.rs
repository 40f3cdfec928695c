//! Wiki publisher port
//!
//! Defines how rendered page content reaches the wiki.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for replacing the content of a wiki page
///
/// Credentials are bound when the implementation is constructed. Any
/// failure maps to [`ApplicationError::Publish`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WikiPublisherPort: Send + Sync {
    /// Overwrite the page `title` with `content`
    async fn publish(
        &self,
        title: &str,
        content: &str,
        summary: &str,
    ) -> Result<(), ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn WikiPublisherPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn WikiPublisherPort>();
    }
}
