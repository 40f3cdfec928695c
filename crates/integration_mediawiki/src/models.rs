//! MediaWiki API response models
//!
//! Only the fields the client reads are modelled; everything else in the
//! JSON is ignored.

use serde::{Deserialize, Serialize};

/// The `error` object MediaWiki returns instead of a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Machine-readable code, e.g. `badtoken`
    pub code: String,
    /// Human-readable description
    #[serde(default)]
    pub info: String,
}

/// Response to `action=query&meta=tokens`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Token container
    pub query: Option<TokenQuery>,
    /// API-level error
    pub error: Option<ApiError>,
}

/// `query` part of a token response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenQuery {
    /// Requested tokens
    pub tokens: Tokens,
}

/// Tokens by type
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tokens {
    /// Present for `type=login`
    pub logintoken: Option<String>,
    /// Present for the default `type=csrf`
    pub csrftoken: Option<String>,
}

impl TokenResponse {
    /// Consume the response, returning the login token
    pub(crate) fn into_login_token(self) -> Option<String> {
        self.query.and_then(|q| q.tokens.logintoken)
    }

    /// Consume the response, returning the CSRF token
    pub(crate) fn into_csrf_token(self) -> Option<String> {
        self.query.and_then(|q| q.tokens.csrftoken)
    }
}

/// Response to `action=login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Login result
    pub login: Option<LoginResult>,
    /// API-level error
    pub error: Option<ApiError>,
}

/// `login` part of a login response
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResult {
    /// `Success`, `Failed`, `Aborted`, ...
    pub result: String,
    /// Explanation when the login did not succeed
    #[serde(default)]
    pub reason: Option<serde_json::Value>,
    /// Name the session is logged in as
    #[serde(default)]
    pub lgusername: Option<String>,
}

impl LoginResult {
    /// Check if the login succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result == "Success"
    }

    /// Reason text, whether MediaWiki sent a string or an object
    #[must_use]
    pub fn reason_text(&self) -> String {
        match &self.reason {
            Some(serde_json::Value::String(reason)) => reason.clone(),
            Some(other) => other.to_string(),
            None => self.result.clone(),
        }
    }
}

/// Response to `action=edit`
#[derive(Debug, Clone, Deserialize)]
pub struct EditResponse {
    /// Edit result
    pub edit: Option<EditResult>,
    /// API-level error
    pub error: Option<ApiError>,
}

/// `edit` part of an edit response
#[derive(Debug, Clone, Deserialize)]
pub struct EditResult {
    /// `Success` or `Failure`
    pub result: String,
    /// Title of the edited page
    #[serde(default)]
    pub title: Option<String>,
    /// Revision created by the edit
    #[serde(default)]
    pub newrevid: Option<u64>,
    /// Present when the text was identical to the current revision
    #[serde(default)]
    pub nochange: Option<serde_json::Value>,
}

impl EditResult {
    /// Check if the edit succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result == "Success"
    }
}
