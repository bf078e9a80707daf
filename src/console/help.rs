//! Help/reference catalog
//!
//! Index- or title-addressable snippets that are inserted verbatim.

use crate::config::HelpEntry;

#[derive(Debug, Clone, Default)]
pub struct HelpCatalog {
    entries: Vec<HelpEntry>,
}

impl HelpCatalog {
    pub fn new(entries: Vec<HelpEntry>) -> Self {
        Self { entries }
    }

    /// Titles in display order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snippet at `index`
    pub fn lookup(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.snippet.as_str())
    }

    /// Snippet whose title matches `key`, ignoring case
    pub fn lookup_by_title(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.title.eq_ignore_ascii_case(key))
            .map(|e| e.snippet.as_str())
    }
}
