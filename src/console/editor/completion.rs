//! Completion suggestions for the token before the caret
//!
//! Candidates come from the keyword and type tables, identifiers already in
//! the document and any registered extras. Ranking:
//! - exact (case-sensitive) prefix matches first, shorter labels first
//! - then fuzzy matches via nucleo, best score first, shorter labels first

use super::syntax::{self, is_ident_char};
use super::{EditOutcome, TextBuffer};
use nucleo::{Matcher, Utf32Str};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::ops::Range;

/// Completion candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Label to display
    pub label: String,
    /// Text that replaces the token on accept
    pub insert_text: String,
    /// Kind of completion
    pub kind: SuggestionKind,
    /// Optional detail/description
    pub detail: Option<String>,
}

impl Suggestion {
    pub fn new(label: impl Into<String>, kind: SuggestionKind) -> Self {
        let label = label.into();
        Self {
            insert_text: label.clone(),
            label,
            kind,
            detail: None,
        }
    }

    pub fn with_insert_text(mut self, insert_text: impl Into<String>) -> Self {
        self.insert_text = insert_text.into();
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Suggestion kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionKind {
    Keyword,
    Type,
    /// Identifier found in the document
    Symbol,
    /// Fixed snippet
    Snippet,
}

impl SuggestionKind {
    /// Get display character for kind
    pub fn icon(&self) -> &'static str {
        match self {
            SuggestionKind::Keyword => "K",
            SuggestionKind::Type => "T",
            SuggestionKind::Symbol => "S",
            SuggestionKind::Snippet => "»",
        }
    }
}

/// Token around the caret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenContext {
    /// Part of the token before the caret
    pub prefix: String,
    /// Whole token, replaced on accept
    pub span: Range<usize>,
}

/// Suggestion engine
pub struct SuggestionEngine {
    /// Fuzzy matcher
    matcher: Matcher,
    enabled: bool,
    max_results: usize,
    /// Candidates registered by the host
    extra: Vec<Suggestion>,
    computations: u64,
}

impl SuggestionEngine {
    pub fn new(max_results: usize) -> Self {
        Self {
            matcher: Matcher::new(nucleo::Config::DEFAULT),
            enabled: true,
            max_results,
            extra: Vec::new(),
            computations: 0,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of suggestion passes actually computed
    pub fn computations(&self) -> u64 {
        self.computations
    }

    /// Offer an extra candidate alongside the built-in tables
    pub fn register(&mut self, suggestion: Suggestion) {
        if !self.extra.iter().any(|s| s.label == suggestion.label) {
            self.extra.push(suggestion);
        }
    }

    /// Ranked suggestions for the token before `caret`
    ///
    /// Returns nothing, without doing any work, while disabled.
    pub fn suggest(&mut self, document: &str, caret: usize) -> Vec<Suggestion> {
        if !self.enabled {
            return Vec::new();
        }
        self.computations += 1;

        let context = Self::token_at(document, caret);
        let prefix = context.prefix.as_str();
        if prefix.is_empty() || prefix.starts_with(|c: char| c.is_ascii_digit()) {
            return Vec::new();
        }

        let needle = prefix.to_lowercase();
        let before: String = document.chars().take(caret).collect();
        let mut seen = HashSet::new();
        let mut ranked = Vec::new();

        for candidate in self.candidates(document, &context.span) {
            // Already completed at the caret
            if candidate.label == prefix || before.ends_with(candidate.insert_text.as_str()) {
                continue;
            }
            if !seen.insert(candidate.label.clone()) {
                continue;
            }

            let key = if candidate.label.starts_with(prefix) {
                (0, Reverse(0))
            } else {
                match self.fuzzy_match(&needle, &candidate.label) {
                    Some(score) => (1, Reverse(score)),
                    None => continue,
                }
            };
            ranked.push((key, candidate));
        }

        ranked.sort_by(|(a_key, a), (b_key, b)| {
            a_key
                .cmp(b_key)
                .then(a.label.len().cmp(&b.label.len()))
                .then_with(|| a.label.cmp(&b.label))
        });
        ranked.truncate(self.max_results);
        ranked.into_iter().map(|(_, candidate)| candidate).collect()
    }

    /// Replace the token at the caret with `suggestion.insert_text`
    ///
    /// The caret ends up right after the inserted text.
    pub fn accept(&self, buffer: &mut TextBuffer, suggestion: &Suggestion) -> EditOutcome {
        let caret = buffer.caret().position;
        let context = Self::token_at(&buffer.snapshot(), caret);
        let outcome = buffer.replace(context.span.clone(), &suggestion.insert_text);
        let end = context.span.start + suggestion.insert_text.chars().count();
        buffer.set_caret(end, None);
        outcome
    }

    /// Identifier token touching `caret`
    pub fn token_at(document: &str, caret: usize) -> TokenContext {
        let chars: Vec<char> = document.chars().collect();
        let caret = caret.min(chars.len());

        let mut start = caret;
        while start > 0 && is_ident_char(chars[start - 1]) {
            start -= 1;
        }
        let mut end = caret;
        while end < chars.len() && is_ident_char(chars[end]) {
            end += 1;
        }

        TokenContext {
            prefix: chars[start..caret].iter().collect(),
            span: start..end,
        }
    }

    fn candidates(&self, document: &str, token: &Range<usize>) -> Vec<Suggestion> {
        let keywords = syntax::KEYWORDS
            .iter()
            .map(|k| Suggestion::new(*k, SuggestionKind::Keyword));
        let types = syntax::TYPE_NAMES
            .iter()
            .map(|t| Suggestion::new(*t, SuggestionKind::Type));
        let symbols = syntax::identifiers(document)
            .into_iter()
            .filter(|(range, _)| range != token)
            .map(|(_, name)| Suggestion::new(name, SuggestionKind::Symbol));

        keywords
            .chain(types)
            .chain(self.extra.iter().cloned())
            .chain(symbols)
            .collect()
    }

    fn fuzzy_match(&mut self, needle: &str, label: &str) -> Option<u16> {
        let mut haystack_buf = Vec::new();
        let mut needle_buf = Vec::new();
        let haystack = Utf32Str::new(label, &mut haystack_buf);
        let needle = Utf32Str::new(needle, &mut needle_buf);
        self.matcher.fuzzy_match(haystack, needle)
    }
}
