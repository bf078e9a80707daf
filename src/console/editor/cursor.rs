//! Caret and selection state

use std::ops::Range;

/// Caret position plus optional selection anchor
///
/// Offsets are character (not byte) offsets into the document.
/// `TextBuffer` keeps both values within `[0, len]` after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaretState {
    /// Insertion point
    pub position: usize,

    /// Selection anchor
    /// If Some, the selection spans anchor..position in either direction
    pub anchor: Option<usize>,
}

impl CaretState {
    /// Caret at `position` with no selection
    pub fn at(position: usize) -> Self {
        Self {
            position,
            anchor: None,
        }
    }

    /// Check if there is a non-empty selection
    pub fn has_selection(&self) -> bool {
        matches!(self.anchor, Some(anchor) if anchor != self.position)
    }

    /// Selected range, ordered
    pub fn selection(&self) -> Option<Range<usize>> {
        let anchor = self.anchor?;
        if anchor == self.position {
            return None;
        }
        Some(anchor.min(self.position)..anchor.max(self.position))
    }

    /// Clear selection
    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    pub(crate) fn clamp(&mut self, len: usize) {
        self.position = self.position.min(len);
        self.anchor = self.anchor.map(|a| a.min(len));
    }

    /// Shift offsets after `len` characters were inserted at `at`
    pub(crate) fn shift_for_insert(&mut self, at: usize, len: usize) {
        let shift = |offset: usize| if offset >= at { offset + len } else { offset };
        self.position = shift(self.position);
        self.anchor = self.anchor.map(shift);
    }

    /// Pull offsets back after `range` was removed
    pub(crate) fn shift_for_delete(&mut self, range: &Range<usize>) {
        let removed = range.end - range.start;
        let shift = |offset: usize| {
            if offset >= range.end {
                offset - removed
            } else if offset > range.start {
                range.start
            } else {
                offset
            }
        };
        self.position = shift(self.position);
        self.anchor = self.anchor.map(shift);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_is_ordered() {
        let caret = CaretState {
            position: 2,
            anchor: Some(7),
        };
        assert_eq!(caret.selection(), Some(2..7));

        let caret = CaretState {
            position: 7,
            anchor: Some(2),
        };
        assert_eq!(caret.selection(), Some(2..7));
    }

    #[test]
    fn test_empty_selection_is_none() {
        let caret = CaretState {
            position: 4,
            anchor: Some(4),
        };
        assert!(!caret.has_selection());
        assert_eq!(caret.selection(), None);
    }

    #[test]
    fn test_delete_shift_collapses_into_range() {
        let mut caret = CaretState {
            position: 5,
            anchor: Some(12),
        };
        caret.shift_for_delete(&(3..8));
        assert_eq!(caret.position, 3);
        assert_eq!(caret.anchor, Some(7));
    }
}
