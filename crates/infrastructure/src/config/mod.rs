//! Application configuration
//!
//! Read from an optional TOML file and then overridden by environment
//! variables. Split into sub-modules by section:
//! - `calendar`: feed URL, display timezone, keyword links
//! - `wiki`: API endpoint, target page, credentials
//! - `http`: timeout and user agent
//! - `logging`: output format and filter

mod calendar;
mod http;
mod logging;
mod wiki;

use std::path::Path;

use application::{ApplicationError, RunMode};
use integration_mediawiki::MediaWikiConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use calendar::{CalendarConfig, LinkEntry};
pub use http::HttpConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use wiki::WikiConfig;

/// Config file read when no path is given, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Placeholder written instead of the password when printing the config
pub const REDACTED: &str = "[REDACTED]";

/// Environment variables and the keys they override
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("CALENDAR_URL", "calendar.url"),
    ("CALENDAR_TIMEZONE", "calendar.timezone"),
    ("LINK_KEYWORDS", "calendar.link_keywords"),
    ("WIKI_API_URL", "wiki.api_url"),
    ("WIKI_PAGE_TITLE", "wiki.page_title"),
    ("WIKI_USERNAME", "wiki.username"),
    ("WIKI_PASSWORD", "wiki.password"),
    ("EDIT_SUMMARY", "wiki.edit_summary"),
    ("INFO_TEXT", "wiki.info"),
    ("HTTP_TIMEOUT_SECS", "http.timeout_secs"),
    ("LOG_FORMAT", "logging.format"),
    ("RUST_LOG", "logging.filter"),
];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more settings are missing or malformed
    #[error("Invalid configuration: {}", .violations.join("; "))]
    Invalid {
        /// Every problem found, in section order
        violations: Vec<String>,
    },

    /// The file could not be read or a value has the wrong type
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The configuration could not be written as TOML
    #[error("Failed to render configuration: {0}")]
    Render(String),
}

impl From<ConfigError> for ApplicationError {
    fn from(error: ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Calendar feed configuration
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Wiki target configuration
    #[serde(default)]
    pub wiki: WikiConfig,

    /// Outbound HTTP configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `path` (or `config.toml`) and the process
    /// environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |var| std::env::var(var).ok())
    }

    /// Load configuration, reading environment overrides through `lookup`
    ///
    /// An explicit `path` must exist; the default file is optional. Empty
    /// variables count as unset.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let mut builder = config::Config::builder()
            .add_source(file.format(config::FileFormat::Toml));

        for (var, key) in ENV_OVERRIDES {
            let value = lookup(var).filter(|value| !value.trim().is_empty());
            if value.is_some() {
                debug!(var, "Applying environment override");
            }
            builder = builder.set_override_option(*key, value)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Check everything a run in `mode` needs, reporting all problems at once
    pub fn validate(&self, mode: RunMode) -> Result<(), ConfigError> {
        let mut violations = Vec::new();

        match self.calendar.url.as_deref().map(str::trim) {
            None | Some("") => violations.push("CALENDAR_URL is not set".to_string()),
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                violations.push(format!("CALENDAR_URL '{url}' is not an http(s) URL"));
            },
            Some(_) => {},
        }

        if let Err(e) = self.calendar.timezone() {
            violations.push(e.to_string());
        }

        if let Err(errors) = self.calendar.link_rules() {
            violations.extend(errors.iter().map(ToString::to_string));
        }

        if self.http.timeout_secs == 0 {
            violations.push("HTTP_TIMEOUT_SECS must be greater than zero".to_string());
        }

        if mode == RunMode::Publish {
            violations.extend(self.missing_wiki_settings());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { violations })
        }
    }

    /// Client settings for the wiki, built from the `wiki` and `http` sections
    pub fn mediawiki_config(&self) -> Result<MediaWikiConfig, ConfigError> {
        let violations = self.missing_wiki_settings();
        let (Some(api_url), Some(username), Some(password)) = (
            self.wiki.api_url.as_deref(),
            self.wiki.username.as_deref(),
            self.wiki.password_str(),
        ) else {
            return Err(ConfigError::Invalid { violations });
        };

        Ok(MediaWikiConfig::new(api_url, username, password)
            .with_timeout_secs(self.http.timeout_secs)
            .with_user_agent(self.http.user_agent.as_str()))
    }

    /// The configuration as TOML, with the password replaced by a placeholder
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        let mut value =
            toml::Value::try_from(self).map_err(|e| ConfigError::Render(e.to_string()))?;

        if self.wiki.password.is_some() {
            if let Some(wiki) = value.get_mut("wiki").and_then(toml::Value::as_table_mut) {
                wiki.insert(
                    "password".to_string(),
                    toml::Value::String(REDACTED.to_string()),
                );
            }
        }

        toml::to_string_pretty(&value).map_err(|e| ConfigError::Render(e.to_string()))
    }

    fn missing_wiki_settings(&self) -> Vec<String> {
        let blank = |value: Option<&str>| value.is_none_or(|v| v.trim().is_empty());

        [
            ("WIKI_API_URL", blank(self.wiki.api_url.as_deref())),
            ("WIKI_PAGE_TITLE", blank(self.wiki.page_title.as_deref())),
            ("WIKI_USERNAME", blank(self.wiki.username.as_deref())),
            ("WIKI_PASSWORD", blank(self.wiki.password_str())),
        ]
        .into_iter()
        .filter(|(_, missing)| *missing)
        .map(|(var, _)| format!("{var} is not set"))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    fn complete_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("CALENDAR_URL", "https://example.org/calendar.ics"),
            ("WIKI_API_URL", "https://wiki.example.org/api.php"),
            ("WIKI_PAGE_TITLE", "Termine"),
            ("WIKI_USERNAME", "bot"),
            ("WIKI_PASSWORD", "s3cret"),
        ]
    }

    #[test]
    fn app_config_default() {
        let config = AppConfig::default();
        assert!(config.calendar.url.is_none());
        assert_eq!(config.calendar.timezone, "Europe/Berlin");
        assert_eq!(config.wiki.edit_summary, "refreshed via script");
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn invalid_error_lists_every_violation() {
        let err = ConfigError::Invalid {
            violations: vec!["A is not set".to_string(), "B is not set".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration: A is not set; B is not set"
        );
    }

    #[test]
    fn config_error_is_a_configuration_application_error() {
        let err: ApplicationError = ConfigError::Invalid {
            violations: vec!["x".to_string()],
        }
        .into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn validate_complete_publish_config() {
        let config = AppConfig::load_with(None, env(&complete_env())).unwrap();
        assert!(config.validate(RunMode::Publish).is_ok());
    }

    #[test]
    fn validate_collects_all_missing_settings() {
        let config = AppConfig::load_with(None, env(&[])).unwrap();
        let Err(ConfigError::Invalid { violations }) = config.validate(RunMode::Publish) else {
            panic!("expected invalid configuration");
        };
        assert_eq!(violations.len(), 5);
        assert!(violations[0].contains("CALENDAR_URL"));
        assert!(violations.iter().any(|v| v.contains("WIKI_PASSWORD")));
    }

    #[test]
    fn dry_run_does_not_need_wiki_settings() {
        let config = AppConfig::load_with(
            None,
            env(&[("CALENDAR_URL", "https://example.org/calendar.ics")]),
        )
        .unwrap();
        assert!(config.validate(RunMode::DryRun).is_ok());
        assert!(config.validate(RunMode::Publish).is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let config = AppConfig::load_with(
            None,
            env(&[
                ("CALENDAR_URL", "ftp://example.org/calendar.ics"),
                ("CALENDAR_TIMEZONE", "Mars/Olympus"),
                ("LINK_KEYWORDS", "broken"),
                ("HTTP_TIMEOUT_SECS", "0"),
            ]),
        )
        .unwrap();
        let Err(ConfigError::Invalid { violations }) = config.validate(RunMode::DryRun) else {
            panic!("expected invalid configuration");
        };
        assert_eq!(violations.len(), 4, "{violations:?}");
    }

    #[test]
    fn empty_variables_count_as_unset() {
        let config = AppConfig::load_with(None, env(&[("INFO_TEXT", "  ")])).unwrap();
        assert!(config.wiki.info.is_none());
    }

    #[test]
    fn mediawiki_config_uses_http_settings() {
        let mut vars = complete_env();
        vars.push(("HTTP_TIMEOUT_SECS", "12"));
        let config = AppConfig::load_with(None, env(&vars)).unwrap();

        let wiki = config.mediawiki_config().unwrap();
        assert_eq!(wiki.api_url, "https://wiki.example.org/api.php");
        assert_eq!(wiki.username, "bot");
        assert_eq!(wiki.password, "s3cret");
        assert_eq!(wiki.timeout_secs, 12);
    }

    #[test]
    fn mediawiki_config_requires_credentials() {
        let config = AppConfig::default();
        assert!(matches!(
            config.mediawiki_config(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn redacted_toml_hides_password() {
        let config = AppConfig::load_with(None, env(&complete_env())).unwrap();
        let toml = config.to_redacted_toml().unwrap();

        assert!(toml.contains("[wiki]"));
        assert!(toml.contains(REDACTED));
        assert!(!toml.contains("s3cret"));
        assert!(toml.contains("https://example.org/calendar.ics"));
    }

    #[test]
    fn redacted_toml_without_password() {
        let toml = AppConfig::default().to_redacted_toml().unwrap();
        assert!(!toml.contains(REDACTED));
    }
}
