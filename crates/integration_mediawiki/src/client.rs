//! MediaWiki Action API client
//!
//! Logs in with a bot password and replaces the full text of a page. All
//! requests share one cookie store so the session survives between steps.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::models::{ApiError, EditResponse, LoginResponse, TokenResponse};

/// CSRF token MediaWiki hands out to sessions that are not logged in
const ANONYMOUS_TOKEN: &str = "+\\";

/// MediaWiki client errors
#[derive(Debug, Error)]
pub enum MediaWikiError {
    /// Connection to the wiki failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the wiki failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Wiki answered with a server error
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Response was not the expected JSON
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Login was rejected
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// A token was missing from the token response
    #[error("Missing {0} token in response")]
    MissingToken(&'static str),

    /// API returned an `error` object
    #[error("API error {code}: {info}")]
    Api {
        /// Error code, e.g. `badtoken`
        code: String,
        /// Error description
        info: String,
    },

    /// Edit was answered without `Success`
    #[error("Edit failed: {0}")]
    EditFailed(String),
}

impl From<ApiError> for MediaWikiError {
    fn from(error: ApiError) -> Self {
        Self::Api {
            code: error.code,
            info: error.info,
        }
    }
}

/// MediaWiki connection configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct MediaWikiConfig {
    /// Full URL of `api.php`
    pub api_url: String,

    /// Bot user name (`User@BotName` for bot passwords)
    pub username: String,

    /// Bot password
    #[serde(skip_serializing, default)]
    pub password: String,

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

impl MediaWikiConfig {
    /// Create a configuration with default timeout and user agent
    #[must_use]
    pub fn new(
        api_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            username: username.into(),
            password: password.into(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl std::fmt::Debug for MediaWikiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaWikiConfig")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Result of a successful edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditOutcome {
    /// Revision created by the edit, absent when nothing changed
    pub new_revid: Option<u64>,
    /// The submitted text was identical to the current revision
    pub no_change: bool,
}

/// Wiki client trait for authenticated page edits
#[async_trait]
pub trait WikiClient: Send + Sync {
    /// Log in with the configured credentials
    async fn login(&self) -> Result<(), MediaWikiError>;

    /// Replace the text of a page; requires a prior [`login`](Self::login)
    async fn edit_page(
        &self,
        title: &str,
        text: &str,
        summary: &str,
    ) -> Result<EditOutcome, MediaWikiError>;

    /// Log in and replace the text of a page
    async fn replace_page(
        &self,
        title: &str,
        text: &str,
        summary: &str,
    ) -> Result<EditOutcome, MediaWikiError> {
        self.login().await?;
        self.edit_page(title, text, summary).await
    }
}

/// MediaWiki HTTP client implementation
#[derive(Debug)]
pub struct MediaWikiClient {
    client: Client,
    config: MediaWikiConfig,
}

impl MediaWikiClient {
    /// Create a new MediaWiki client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: MediaWikiConfig) -> Result<Self, MediaWikiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .build()
            .map_err(|e| MediaWikiError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the configuration
    #[must_use]
    pub const fn config(&self) -> &MediaWikiConfig {
        &self.config
    }

    /// Request tokens; `token_type` `None` asks for the CSRF token
    async fn fetch_tokens(&self, token_type: Option<&str>) -> Result<TokenResponse, MediaWikiError> {
        let mut query = vec![("action", "query"), ("meta", "tokens"), ("format", "json")];
        if let Some(token_type) = token_type {
            query.push(("type", token_type));
        }

        let response = self
            .client
            .get(&self.config.api_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| Self::map_send_error(&e))?;

        let tokens: TokenResponse = Self::read_json(response).await?;
        if let Some(error) = tokens.error {
            return Err(error.into());
        }
        Ok(tokens)
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        form: &[(&str, &str)],
    ) -> Result<T, MediaWikiError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .form(form)
            .send()
            .await
            .map_err(|e| Self::map_send_error(&e))?;

        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, MediaWikiError> {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MediaWikiError::ServiceUnavailable("rate limited".to_string()));
        }
        if status.is_server_error() {
            return Err(MediaWikiError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(MediaWikiError::RequestFailed(format!("HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| MediaWikiError::ParseError(e.to_string()))
    }

    fn map_send_error(error: &reqwest::Error) -> MediaWikiError {
        if error.is_connect() {
            MediaWikiError::ConnectionFailed(error.to_string())
        } else {
            MediaWikiError::RequestFailed(error.to_string())
        }
    }
}

#[async_trait]
impl WikiClient for MediaWikiClient {
    #[instrument(skip(self), fields(api = %self.config.api_url, user = %self.config.username))]
    async fn login(&self) -> Result<(), MediaWikiError> {
        let login_token = self
            .fetch_tokens(Some("login"))
            .await?
            .into_login_token()
            .ok_or(MediaWikiError::MissingToken("login"))?;
        debug!("Received login token");

        let response: LoginResponse = self
            .post_form(&[
                ("action", "login"),
                ("lgname", &self.config.username),
                ("lgpassword", &self.config.password),
                ("lgtoken", &login_token),
                ("format", "json"),
            ])
            .await?;

        if let Some(error) = response.error {
            return Err(error.into());
        }
        let login = response
            .login
            .ok_or_else(|| MediaWikiError::ParseError("No login result in response".to_string()))?;
        if !login.is_success() {
            return Err(MediaWikiError::LoginFailed(login.reason_text()));
        }

        info!(
            user = login.lgusername.as_deref().unwrap_or(&self.config.username),
            "Logged in to wiki"
        );
        Ok(())
    }

    #[instrument(skip(self, text), fields(len = text.len()))]
    async fn edit_page(
        &self,
        title: &str,
        text: &str,
        summary: &str,
    ) -> Result<EditOutcome, MediaWikiError> {
        let csrf_token = self
            .fetch_tokens(None)
            .await?
            .into_csrf_token()
            .ok_or(MediaWikiError::MissingToken("csrf"))?;
        if csrf_token == ANONYMOUS_TOKEN {
            return Err(MediaWikiError::LoginFailed(
                "session is not logged in".to_string(),
            ));
        }

        let response: EditResponse = self
            .post_form(&[
                ("action", "edit"),
                ("title", title),
                ("text", text),
                ("summary", summary),
                ("bot", "1"),
                ("token", &csrf_token),
                ("format", "json"),
            ])
            .await?;

        if let Some(error) = response.error {
            return Err(error.into());
        }
        let edit = response
            .edit
            .ok_or_else(|| MediaWikiError::ParseError("No edit result in response".to_string()))?;
        if !edit.is_success() {
            return Err(MediaWikiError::EditFailed(edit.result));
        }

        let outcome = EditOutcome {
            new_revid: edit.newrevid,
            no_change: edit.nochange.is_some(),
        };
        info!(
            page = edit.title.as_deref().unwrap_or(title),
            revid = ?outcome.new_revid,
            no_change = outcome.no_change,
            "Page edited"
        );
        Ok(outcome)
    }
}
