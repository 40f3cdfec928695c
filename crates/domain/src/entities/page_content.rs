//! Rendered wiki page content

use serde::{Deserialize, Serialize};

/// Complete wikitext for the target page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    /// Number of event rows in the table
    pub row_count: usize,
    /// Full page wikitext, info text included
    pub wikitext: String,
}

impl PageContent {
    /// Create page content from rendered wikitext
    #[must_use]
    pub fn new(wikitext: impl Into<String>, row_count: usize) -> Self {
        Self {
            row_count,
            wikitext: wikitext.into(),
        }
    }

    /// Whether the table has no event rows
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Borrow the wikitext
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.wikitext
    }
}

impl std::fmt::Display for PageContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.wikitext)
    }
}
