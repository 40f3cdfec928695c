//! Keyword-to-link substitution rules

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Separator between pairs in the compact `LINK_KEYWORDS` form (U+00A6 BROKEN BAR)
pub const LINK_PAIR_SEPARATOR: char = '¦';

/// Separator between keyword and replacement inside one pair
pub const LINK_KEY_VALUE_SEPARATOR: char = '=';

/// A keyword and the wiki markup it is replaced with
///
/// The keyword is guaranteed to be non-empty, so a rule can never match
/// the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLinkRule", into = "RawLinkRule")]
pub struct LinkRule {
    keyword: String,
    replacement: String,
}

/// Serialized shape, matching `{ keyword = "...", link = "..." }` in TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawLinkRule {
    keyword: String,
    link: String,
}

impl LinkRule {
    /// Create a rule, rejecting an empty keyword
    pub fn new(
        keyword: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let keyword = keyword.into();
        if keyword.is_empty() {
            return Err(DomainError::invalid_link_rule("keyword must not be empty"));
        }
        Ok(Self {
            keyword,
            replacement: replacement.into(),
        })
    }

    /// Parse a single `keyword=replacement` pair
    ///
    /// Splits on the first `=`, so replacements may contain `=` themselves.
    pub fn parse_pair(pair: &str) -> Result<Self, DomainError> {
        let (keyword, replacement) = pair.split_once(LINK_KEY_VALUE_SEPARATOR).ok_or_else(|| {
            DomainError::invalid_link_rule(format!("'{pair}' is not of the form keyword=link"))
        })?;
        Self::new(keyword.trim(), replacement.trim())
    }

    /// Parse the compact list form, e.g. `Foo=[[Foo]]¦Bar=[[Bar]]`
    ///
    /// Blank segments are skipped. Every malformed pair is reported, not
    /// just the first one.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, Vec<DomainError>> {
        let mut rules = Vec::new();
        let mut errors = Vec::new();

        for segment in input.split(LINK_PAIR_SEPARATOR) {
            if segment.trim().is_empty() {
                continue;
            }
            match Self::parse_pair(segment) {
                Ok(rule) => rules.push(rule),
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            Ok(rules)
        } else {
            Err(errors)
        }
    }

    /// The text to look for
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The markup that replaces every occurrence of the keyword
    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every occurrence of the keyword in `text`
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        if text.contains(&self.keyword) {
            text.replace(&self.keyword, &self.replacement)
        } else {
            text.to_string()
        }
    }
}

impl fmt::Display for LinkRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{LINK_KEY_VALUE_SEPARATOR}{}",
            self.keyword, self.replacement
        )
    }
}

impl TryFrom<RawLinkRule> for LinkRule {
    type Error = DomainError;

    fn try_from(raw: RawLinkRule) -> Result<Self, Self::Error> {
        Self::new(raw.keyword, raw.link)
    }
}

impl From<LinkRule> for RawLinkRule {
    fn from(rule: LinkRule) -> Self {
        Self {
            keyword: rule.keyword,
            link: rule.replacement,
        }
    }
}
