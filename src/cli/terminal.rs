//! Terminal presentation layer
//!
//! Prints the document as a line-numbered overlay, colored with ANSI escapes
//! when the output is a terminal. The raw text, highlight spans and gutter
//! arrive as separate layers; the overlay is printed once the gutter for the
//! current refresh is known.

use crate::console::editor::{CaretState, Gutter, StyleTag, StyledSpan, Suggestion};
use crate::console::PresentationLayer;
use crossterm::style::{Color, Stylize};
use std::io::Write;
use tracing::warn;

pub struct TerminalPresentation<W: Write> {
    out: W,
    color: bool,
    raw: String,
    caret: CaretState,
    spans: Vec<StyledSpan>,
}

impl<W: Write> TerminalPresentation<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            raw: String::new(),
            caret: CaretState::default(),
            spans: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, style: StyleTag) -> String {
        if !self.color || style == StyleTag::Plain {
            return text.to_string();
        }
        let (r, g, b) = style.color();
        text.to_string().with(Color::Rgb { r, g, b }).to_string()
    }

    fn dim(&self, text: String) -> String {
        if self.color {
            text.dim().to_string()
        } else {
            text
        }
    }

    /// Document split into lines, each colored by the current spans
    fn styled_lines(&self) -> Vec<String> {
        let chars: Vec<char> = self.raw.chars().collect();
        let mut lines = vec![String::new()];
        let mut cursor = 0;

        for span in &self.spans {
            let start = span.start.min(chars.len());
            let end = span.end.min(chars.len());
            if start > cursor {
                self.append(&mut lines, &chars[cursor..start], StyleTag::Plain);
            }
            if end > start.max(cursor) {
                self.append(&mut lines, &chars[start.max(cursor)..end], span.style);
                cursor = end;
            }
        }
        if cursor < chars.len() {
            self.append(&mut lines, &chars[cursor..], StyleTag::Plain);
        }
        lines
    }

    fn append(&self, lines: &mut Vec<String>, segment: &[char], style: StyleTag) {
        let text: String = segment.iter().collect();
        for (i, piece) in text.split('\n').enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            if !piece.is_empty() {
                let painted = self.paint(piece, style);
                if let Some(line) = lines.last_mut() {
                    line.push_str(&painted);
                }
            }
        }
    }

    fn write_block(&mut self, block: String) {
        if let Err(err) = self.out.write_all(block.as_bytes()).and_then(|_| self.out.flush()) {
            warn!("Failed to write to terminal: {}", err);
        }
    }
}

impl<W: Write> PresentationLayer for TerminalPresentation<W> {
    fn render_text(&mut self, raw: &str, caret: CaretState) {
        self.raw = raw.to_string();
        self.caret = caret;
    }

    fn render_highlight(&mut self, raw: &str, spans: &[StyledSpan]) {
        self.raw = raw.to_string();
        self.spans = spans.to_vec();
    }

    fn render_line_numbers(&mut self, gutter: &Gutter) {
        let lines = self.styled_lines();
        let width = gutter.width();
        let mut block = String::new();

        for (label, line) in gutter.labels.iter().zip(lines.iter().skip(gutter.first_line)) {
            let label = self.dim(format!("{:>width$} |", label, width = width));
            block.push_str(&format!("{} {}\n", label, line));
        }

        let status = match self.caret.selection() {
            Some(selection) => format!(
                "-- caret {} selection {}..{} --",
                self.caret.position, selection.start, selection.end
            ),
            None => format!("-- caret {} --", self.caret.position),
        };
        block.push_str(&self.dim(status));
        block.push('\n');
        self.write_block(block);
    }

    fn render_suggestions(&mut self, suggestions: &[Suggestion], selected: Option<usize>) {
        if suggestions.is_empty() {
            return;
        }
        let mut block = String::new();
        for (i, suggestion) in suggestions.iter().enumerate() {
            let marker = if Some(i) == selected { ">" } else { " " };
            let detail = suggestion
                .detail
                .as_deref()
                .map(|d| format!("  {}", d))
                .unwrap_or_default();
            block.push_str(&format!(
                "{} {} {} {}{}\n",
                marker,
                i,
                suggestion.kind.icon(),
                suggestion.label,
                self.dim(detail)
            ));
        }
        self.write_block(block);
    }
}
