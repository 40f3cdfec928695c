//! MediaWiki adapter - Implements `WikiPublisherPort` using integration_mediawiki

use std::sync::Arc;

use application::{error::ApplicationError, ports::WikiPublisherPort};
use async_trait::async_trait;
use integration_mediawiki::{MediaWikiClient, MediaWikiConfig, MediaWikiError, WikiClient};
use tracing::{info, instrument};

/// Adapter publishing pages through the MediaWiki Action API
pub struct MediaWikiAdapter {
    client: Arc<dyn WikiClient>,
}

impl std::fmt::Debug for MediaWikiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaWikiAdapter").finish_non_exhaustive()
    }
}

impl MediaWikiAdapter {
    /// Create an adapter with an HTTP client built from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: MediaWikiConfig) -> Result<Self, ApplicationError> {
        let client =
            MediaWikiClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create an adapter around an existing client
    pub fn with_client(client: Arc<dyn WikiClient>) -> Self {
        Self { client }
    }

    /// Map integration wiki error to application error
    ///
    /// Everything that goes wrong while publishing is a publish failure.
    fn map_error(err: MediaWikiError) -> ApplicationError {
        ApplicationError::Publish(err.to_string())
    }
}

#[async_trait]
impl WikiPublisherPort for MediaWikiAdapter {
    #[instrument(skip(self, content), fields(len = content.len()))]
    async fn publish(
        &self,
        title: &str,
        content: &str,
        summary: &str,
    ) -> Result<(), ApplicationError> {
        let outcome = self
            .client
            .replace_page(title, content, summary)
            .await
            .map_err(Self::map_error)?;

        if outcome.no_change {
            info!(page = %title, "Page content unchanged");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use integration_mediawiki::EditOutcome;

    use super::*;

    /// Client recording edits, optionally failing the login
    #[derive(Default)]
    struct RecordingClient {
        reject_login: bool,
        edits: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl WikiClient for RecordingClient {
        async fn login(&self) -> Result<(), MediaWikiError> {
            if self.reject_login {
                return Err(MediaWikiError::LoginFailed("wrong password".into()));
            }
            Ok(())
        }

        async fn edit_page(
            &self,
            title: &str,
            text: &str,
            summary: &str,
        ) -> Result<EditOutcome, MediaWikiError> {
            self.edits.lock().unwrap().push((
                title.to_string(),
                text.to_string(),
                summary.to_string(),
            ));
            Ok(EditOutcome::default())
        }
    }

    #[tokio::test]
    async fn publish_replaces_page() {
        let client = Arc::new(RecordingClient::default());
        let adapter = MediaWikiAdapter::with_client(Arc::clone(&client));

        adapter
            .publish("Termine", "{|\n|}", "refreshed via script")
            .await
            .unwrap();

        let edits = client.edits.lock().unwrap();
        assert_eq!(
            *edits,
            [(
                "Termine".to_string(),
                "{|\n|}".to_string(),
                "refreshed via script".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn login_failure_is_publish_error_without_edit() {
        let client = Arc::new(RecordingClient {
            reject_login: true,
            ..Default::default()
        });
        let adapter = MediaWikiAdapter::with_client(Arc::clone(&client));

        let result = adapter.publish("Termine", "text", "summary").await;

        let err = result.unwrap_err();
        assert!(matches!(err, ApplicationError::Publish(_)));
        assert_eq!(err.exit_code(), 5);
        assert!(client.edits.lock().unwrap().is_empty());
    }
}
