//! Links embedded in event descriptions
//!
//! An event can point at a wiki page or an external URL by putting the link
//! markup alone on the first line of its description.

use serde::{Deserialize, Serialize};

/// A wiki or web link attached to an event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventLink {
    /// `[[Page]]` or `[[Page|Label]]`
    Internal { page: String, label: Option<String> },
    /// `[https://url]` or `[https://url Label]`
    External { url: String, label: Option<String> },
}

impl EventLink {
    /// Extract a link from the first line of a description
    #[must_use]
    pub fn from_description(description: &str) -> Option<Self> {
        let first_line = description.trim().lines().next()?.trim();
        Self::parse_internal(first_line).or_else(|| Self::parse_external(first_line))
    }

    fn parse_internal(line: &str) -> Option<Self> {
        let inner = line.strip_prefix("[[")?.strip_suffix("]]")?;
        if inner.is_empty() || inner.contains(']') {
            return None;
        }
        let (page, label) = match inner.split_once('|') {
            Some((page, label)) => (page, Some(label.to_string())),
            None => (inner, None),
        };
        Some(Self::Internal {
            page: page.to_string(),
            label,
        })
    }

    fn parse_external(line: &str) -> Option<Self> {
        let inner = line.strip_prefix('[')?.strip_suffix(']')?;
        if inner.contains(']') {
            return None;
        }
        let (url, label) = match inner.split_once(char::is_whitespace) {
            Some((url, label)) => {
                let label = label.trim();
                (url, (!label.is_empty()).then(|| label.to_string()))
            },
            None => (inner, None),
        };
        let has_scheme = url.starts_with("http://") || url.starts_with("https://");
        let has_host = url.split_once("://").is_some_and(|(_, rest)| !rest.is_empty());
        if !has_scheme || !has_host {
            return None;
        }
        Some(Self::External {
            url: url.to_string(),
            label,
        })
    }

    /// Wrap an (already escaped) event title in this link
    ///
    /// Links that carry their own label are emitted unchanged; otherwise the
    /// title becomes the label.
    #[must_use]
    pub fn wrap(&self, title: &str) -> String {
        match self {
            Self::Internal {
                page,
                label: Some(label),
            } => format!("[[{page}|{label}]]"),
            Self::Internal { page, label: None } => format!("[[{page}|{title}]]"),
            Self::External {
                url,
                label: Some(label),
            } => format!("[{url} {label}]"),
            Self::External { url, label: None } => format!("[{url} {title}]"),
        }
    }
}
