//! Line index and line-number gutter
//!
//! Tracks line-start offsets for the document and projects them onto the
//! scroll position reported by the presentation layer. The gutter is derived
//! from the same scroll offset as the text so its rows cannot drift.

use std::ops::{Range, RangeInclusive};

/// Scroll position reported by the presentation layer
///
/// Both values use the same unit as [`LineIndex::line_height`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Distance from the top of the content to the top of the viewport
    pub offset: f32,
    /// Height of the visible area
    pub viewport_height: f32,
}

/// Line-number column for the current viewport
#[derive(Debug, Clone, PartialEq)]
pub struct Gutter {
    /// First visible line (0-based)
    pub first_line: usize,
    /// Last visible line (0-based, inclusive)
    pub last_line: usize,
    /// Vertical shift of the gutter's first row relative to the viewport top
    pub y_offset: f32,
    /// 1-based labels for `first_line..=last_line`
    pub labels: Vec<String>,
}

impl Gutter {
    /// Labels joined one per row
    pub fn text(&self) -> String {
        self.labels.join("\n")
    }

    /// Width of the widest label
    pub fn width(&self) -> usize {
        self.labels.iter().map(String::len).max().unwrap_or(1)
    }
}

/// Tracks line boundaries in the document
///
/// `line_starts[0] == 0` always; entry `i + 1` is the offset right after the
/// `i`-th newline. Offsets are character offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
    line_height: f32,
}

impl LineIndex {
    /// Create an index for an empty document
    pub fn new(line_height: f32) -> Self {
        Self {
            line_starts: vec![0],
            len: 0,
            line_height,
        }
    }

    /// Recompute line starts from `document`
    pub fn rebuild(&mut self, document: &str) {
        self.line_starts.clear();
        self.line_starts.push(0);

        let mut offset = 0;
        for ch in document.chars() {
            offset += 1;
            if ch == '\n' {
                self.line_starts.push(offset);
            }
        }
        self.len = offset;
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Number of lines; an empty document has one
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }

    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Range of `line`, excluding its newline
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        let start = self.line_start(line)?;
        let end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.len,
        };
        Some(start..end)
    }

    /// 0-based line containing `offset`; offsets past the end map to the last line
    pub fn line_number_at(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        }
    }

    /// Lines intersecting the viewport, clamped to existing lines
    pub fn visible_range(&self, scroll_offset: f32, viewport_height: f32) -> RangeInclusive<usize> {
        let last_line = self.line_count() - 1;
        let first = self.row_at(scroll_offset).min(last_line);

        if viewport_height <= 0.0 || !viewport_height.is_finite() {
            return first..=first;
        }

        let bottom = ((scroll_offset + viewport_height) / self.line_height).ceil();
        let last = if bottom.is_finite() && bottom > 0.0 {
            (bottom as usize).saturating_sub(1)
        } else {
            first
        };
        first..=last.clamp(first, last_line)
    }

    /// Line-number column aligned with the first visible text row
    pub fn gutter(&self, scroll: ScrollMetrics) -> Gutter {
        let range = self.visible_range(scroll.offset, scroll.viewport_height);
        let (first_line, last_line) = (*range.start(), *range.end());
        let labels = range.map(|line| (line + 1).to_string()).collect();

        Gutter {
            first_line,
            last_line,
            y_offset: first_line as f32 * self.line_height - scroll.offset,
            labels,
        }
    }

    fn row_at(&self, offset: f32) -> usize {
        if offset <= 0.0 || !offset.is_finite() || self.line_height <= 0.0 {
            return 0;
        }
        (offset / self.line_height).floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(text: &str) -> LineIndex {
        let mut index = LineIndex::new(10.0);
        index.rebuild(text);
        index
    }

    #[test]
    fn test_empty_document_has_one_line() {
        let index = index("");
        assert_eq!(index.line_starts(), &[0]);
        assert_eq!(index.line_number_at(0), 0);
        assert_eq!(index.line_range(0), Some(0..0));
    }

    #[test]
    fn test_line_starts_follow_newlines() {
        let index = index("if(x){\n  y();\n}\n");
        assert_eq!(index.line_starts(), &[0, 7, 14, 16]);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_range(1), Some(7..13));
        assert_eq!(index.line_range(3), Some(16..16));
    }

    #[test]
    fn test_line_number_at() {
        let index = index("ab\ncd\n");
        assert_eq!(index.line_number_at(0), 0);
        assert_eq!(index.line_number_at(2), 0);
        assert_eq!(index.line_number_at(3), 1);
        assert_eq!(index.line_number_at(6), 2);
        assert_eq!(index.line_number_at(100), 2);
    }

    #[test]
    fn test_offsets_are_characters() {
        let index = index("é\n😀\n");
        assert_eq!(index.line_starts(), &[0, 2, 4]);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let mut index = index("one\ntwo");
        let before = index.clone();
        index.rebuild("one\ntwo");
        assert_eq!(index, before);
    }

    #[test]
    fn test_visible_range() {
        let index = index("a\nb\nc\nd\ne");
        assert_eq!(index.visible_range(0.0, 20.0), 0..=1);
        assert_eq!(index.visible_range(15.0, 20.0), 1..=3);
        assert_eq!(index.visible_range(0.0, 1000.0), 0..=4);
        assert_eq!(index.visible_range(-30.0, 20.0), 0..=0);
        assert_eq!(index.visible_range(500.0, 20.0), 4..=4);
        assert_eq!(index.visible_range(20.0, 0.0), 2..=2);
    }

    #[test]
    fn test_gutter_aligns_with_scroll_offset() {
        let index = index("a\nb\nc\nd");
        let gutter = index.gutter(ScrollMetrics {
            offset: 15.0,
            viewport_height: 20.0,
        });
        assert_eq!(gutter.first_line, 1);
        assert_eq!(gutter.last_line, 3);
        assert_eq!(gutter.labels, vec!["2", "3", "4"]);
        // Row for line 2 starts 5 units above the viewport top, like its text row
        assert_eq!(gutter.y_offset, -5.0);
        assert_eq!(gutter.text(), "2\n3\n4");
    }
}
