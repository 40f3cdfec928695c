//! Keyword linker
//!
//! Turns plain keywords in event text into wiki link markup.

use domain::LinkRule;

/// Apply `rules` to `text` in order
///
/// Each rule sees the output of the previous one, so a later rule can match
/// text that an earlier replacement introduced.
#[must_use]
pub fn apply_links(text: &str, rules: &[LinkRule]) -> String {
    rules
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc))
}

/// Ordered set of link rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordLinker {
    rules: Vec<LinkRule>,
}

impl KeywordLinker {
    /// Create a linker from rules in application order
    #[must_use]
    pub const fn new(rules: Vec<LinkRule>) -> Self {
        Self { rules }
    }

    /// The configured rules
    #[must_use]
    pub fn rules(&self) -> &[LinkRule] {
        &self.rules
    }

    /// Check if there are no rules
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply all rules to `text`
    #[must_use]
    pub fn apply_links(&self, text: &str) -> String {
        apply_links(text, &self.rules)
    }
}
