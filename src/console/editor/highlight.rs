//! Lexer-driven syntax highlighting
//!
//! Produces styled spans over the whole document. The spans are an overlay:
//! they describe how to paint the text, they never change it.

use super::syntax::{style_for, StyleTag, Token};
use logos::Logos;
use tracing::debug;

/// Styled range of the document, in character offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledSpan {
    pub start: usize,
    pub end: usize,
    pub style: StyleTag,
}

impl StyledSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Result of one highlight pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightPass {
    /// Ordered, non-overlapping spans covering the whole document
    pub spans: Vec<StyledSpan>,
    /// Offset where lexing stopped, if it did
    pub error_offset: Option<usize>,
}

impl HighlightPass {
    pub fn is_complete(&self) -> bool {
        self.error_offset.is_none()
    }
}

/// Full-document highlighter
#[derive(Debug, Default)]
pub struct Highlighter {
    passes: u64,
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of passes run so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Lex `document` and return its styled spans
    ///
    /// On a lex error the spans before the error are kept and the remainder
    /// of the document becomes a single plain span.
    pub fn highlight(&mut self, document: &str) -> HighlightPass {
        self.passes += 1;

        let mut spans: Vec<StyledSpan> = Vec::new();
        let mut lexer = Token::lexer(document);
        let mut offset = 0;
        let mut error_offset = None;

        while let Some(token) = lexer.next() {
            let slice = lexer.slice();
            let len = slice.chars().count();

            match token {
                Ok(token) => {
                    push_merged(
                        &mut spans,
                        StyledSpan {
                            start: offset,
                            end: offset + len,
                            style: style_for(token, slice),
                        },
                    );
                    offset += len;
                }
                Err(()) => {
                    debug!(offset, "Lexing stopped, rest of snippet is plain");
                    error_offset = Some(offset);
                    break;
                }
            }
        }

        if error_offset.is_some() {
            let total = offset + document[lexer.span().start..].chars().count();
            push_merged(
                &mut spans,
                StyledSpan {
                    start: offset,
                    end: total,
                    style: StyleTag::Plain,
                },
            );
        }

        HighlightPass {
            spans,
            error_offset,
        }
    }
}

/// Append `span`, extending the previous one when the style matches
fn push_merged(spans: &mut Vec<StyledSpan>, span: StyledSpan) {
    if span.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.style == span.style && last.end == span.start => last.end = span.end,
        _ => spans.push(span),
    }
}
