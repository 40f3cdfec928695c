//! Calendar feed configuration: feed URL, display timezone, link rules.

use domain::{DomainError, LinkRule, Timezone};
use serde::{Deserialize, Serialize};

/// One `{ keyword = "...", link = "..." }` entry of `replace_links`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    /// Text to look for in titles and locations
    pub keyword: String,
    /// Wiki markup to put in its place
    pub link: String,
}

/// `[calendar]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// iCalendar feed URL (`CALENDAR_URL`)
    #[serde(default)]
    pub url: Option<String>,

    /// IANA zone for display and floating times (`CALENDAR_TIMEZONE`)
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Keyword rules in table form
    #[serde(default)]
    pub replace_links: Vec<LinkEntry>,

    /// Keyword rules in compact `Foo=[[Foo]]¦Bar=[[Bar]]` form (`LINK_KEYWORDS`)
    #[serde(default)]
    pub link_keywords: Option<String>,
}

fn default_timezone() -> String {
    Timezone::default().name().to_string()
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            url: None,
            timezone: default_timezone(),
            replace_links: Vec::new(),
            link_keywords: None,
        }
    }
}

impl CalendarConfig {
    /// Parsed display timezone
    pub fn timezone(&self) -> Result<Timezone, DomainError> {
        Timezone::parse(&self.timezone)
    }

    /// All link rules: `replace_links` first, then `link_keywords`
    ///
    /// Every broken rule is reported.
    pub fn link_rules(&self) -> Result<Vec<LinkRule>, Vec<DomainError>> {
        let mut rules = Vec::with_capacity(self.replace_links.len());
        let mut errors = Vec::new();

        for entry in &self.replace_links {
            match LinkRule::new(entry.keyword.as_str(), entry.link.as_str()) {
                Ok(rule) => rules.push(rule),
                Err(e) => errors.push(e),
            }
        }

        if let Some(compact) = self.link_keywords.as_deref() {
            match LinkRule::parse_list(compact) {
                Ok(parsed) => rules.extend(parsed),
                Err(parse_errors) => errors.extend(parse_errors),
            }
        }

        if errors.is_empty() {
            Ok(rules)
        } else {
            Err(errors)
        }
    }
}
