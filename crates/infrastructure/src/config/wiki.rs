//! Wiki target configuration: API endpoint, page, credentials.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// `[wiki]` section
#[derive(Clone, Serialize, Deserialize)]
pub struct WikiConfig {
    /// MediaWiki `api.php` URL (`WIKI_API_URL`)
    #[serde(default)]
    pub api_url: Option<String>,

    /// Title of the page that gets replaced (`WIKI_PAGE_TITLE`)
    #[serde(default)]
    pub page_title: Option<String>,

    /// Bot user name (`WIKI_USERNAME`)
    #[serde(default)]
    pub username: Option<String>,

    /// Bot password (`WIKI_PASSWORD`, sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub password: Option<SecretString>,

    /// Edit summary (`EDIT_SUMMARY`)
    #[serde(default = "default_edit_summary")]
    pub edit_summary: String,

    /// Text placed above the table (`INFO_TEXT`)
    #[serde(default)]
    pub info: Option<String>,

    /// Emit the info text as an HTML comment instead of visible text
    #[serde(default)]
    pub info_as_comment: bool,
}

pub(crate) fn default_edit_summary() -> String {
    "refreshed via script".to_string()
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            page_title: None,
            username: None,
            password: None,
            edit_summary: default_edit_summary(),
            info: None,
            info_as_comment: false,
        }
    }
}

impl std::fmt::Debug for WikiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WikiConfig")
            .field("api_url", &self.api_url)
            .field("page_title", &self.page_title)
            .field("username", &self.username)
            .field(
                "password",
                &if self.password.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("edit_summary", &self.edit_summary)
            .field("info", &self.info)
            .field("info_as_comment", &self.info_as_comment)
            .finish()
    }
}

impl WikiConfig {
    /// Get the password as a string reference (for the login request)
    #[must_use]
    pub fn password_str(&self) -> Option<&str> {
        self.password.as_ref().map(ExposeSecret::expose_secret)
    }
}
