//! Text buffer with rope data structure
//!
//! Owns the document text and caret. Every mutation goes through
//! [`TextBuffer::splice`], which enforces the length ceiling, keeps the caret
//! in bounds, records undo history and reports the affected range.

use super::CaretState;
use ropey::Rope;
use std::collections::VecDeque;
use std::ops::Range;
use tracing::warn;

/// Maximum number of edits kept for undo
const MAX_HISTORY: usize = 512;

/// Change notification emitted by every mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Affected range in the document after the change
    pub range: Range<usize>,
    /// Number of characters removed at `range.start`
    pub removed: usize,
    /// Buffer revision after the change
    pub revision: u64,
}

/// Raised when an insert had to be cut short at the length ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityExceeded {
    /// Configured ceiling, in characters
    pub max_len: usize,
    /// Characters the caller tried to insert
    pub requested: usize,
    /// Characters that actually went in
    pub accepted: usize,
}

/// Result of an insert-like mutation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOutcome {
    /// Present when the document changed
    pub change: Option<ChangeEvent>,
    /// Present when the inserted text was truncated
    pub overflow: Option<CapacityExceeded>,
}

/// Edit operation for undo/redo
#[derive(Debug, Clone)]
pub struct Edit {
    /// Position where edit occurred
    pub position: usize,
    /// Text that was inserted (empty if deletion)
    pub inserted: String,
    /// Text that was deleted (empty if insertion)
    pub deleted: String,
    /// Edits sharing a group are undone together
    group: u64,
    /// Caret before the edit, restored on undo
    caret_before: CaretState,
}

impl Edit {
    fn inserted_len(&self) -> usize {
        self.inserted.chars().count()
    }

    fn deleted_len(&self) -> usize {
        self.deleted.chars().count()
    }
}

/// Text buffer with a length ceiling and undo/redo support
pub struct TextBuffer {
    /// Text content (rope for efficient editing)
    content: Rope,

    /// Caret and selection
    caret: CaretState,

    /// Length ceiling in characters
    max_len: usize,

    /// Bumped on every mutation
    revision: u64,

    /// Undo stack
    undo_stack: VecDeque<Edit>,

    /// Redo stack
    redo_stack: VecDeque<Edit>,

    /// Group joined by edits made inside `transaction`
    open_group: Option<u64>,

    next_group: u64,
}

impl TextBuffer {
    /// Create an empty buffer holding at most `max_len` characters
    pub fn new(max_len: usize) -> Self {
        Self {
            content: Rope::new(),
            caret: CaretState::default(),
            max_len,
            revision: 0,
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            open_group: None,
            next_group: 0,
        }
    }

    /// Document length in characters
    pub fn len(&self) -> usize {
        self.content.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn caret(&self) -> CaretState {
        self.caret
    }

    /// Borrow the underlying rope
    pub fn rope(&self) -> &Rope {
        &self.content
    }

    /// Copy of the current document
    pub fn snapshot(&self) -> String {
        self.content.to_string()
    }

    /// Text in `range`, clamped to the document
    pub fn slice(&self, range: Range<usize>) -> String {
        let range = self.clamp_range(range);
        self.content.slice(range).to_string()
    }

    /// Insert `text` at `offset`
    ///
    /// The offset is clamped to the document. Text that would push the
    /// document past the ceiling is truncated and reported in
    /// [`EditOutcome::overflow`]; the fitting prefix is still inserted.
    pub fn insert(&mut self, offset: usize, text: &str) -> EditOutcome {
        let offset = offset.min(self.len());
        self.splice(offset..offset, text, true)
    }

    /// Delete characters in `range`
    pub fn delete(&mut self, range: Range<usize>) -> Option<ChangeEvent> {
        self.splice(range, "", true).change
    }

    /// Replace `range` with `text` as a single edit
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> EditOutcome {
        self.splice(range, text, true)
    }

    /// Replace the selection (or insert at the caret) with `text`
    pub fn replace_selection(&mut self, text: &str) -> EditOutcome {
        let range = self
            .caret
            .selection()
            .unwrap_or(self.caret.position..self.caret.position);
        let outcome = self.splice(range, text, true);
        self.caret.clear_selection();
        outcome
    }

    /// Delete the selection or the character before the caret
    pub fn backspace(&mut self) -> Option<ChangeEvent> {
        let range = match self.caret.selection() {
            Some(range) => range,
            None if self.caret.position > 0 => self.caret.position - 1..self.caret.position,
            None => return None,
        };
        self.caret.clear_selection();
        self.delete(range)
    }

    /// Delete the selection or the character after the caret
    pub fn delete_forward(&mut self) -> Option<ChangeEvent> {
        let range = match self.caret.selection() {
            Some(range) => range,
            None if self.caret.position < self.len() => {
                self.caret.position..self.caret.position + 1
            }
            None => return None,
        };
        self.caret.clear_selection();
        self.delete(range)
    }

    /// Move the caret, clamping both offsets to the document
    pub fn set_caret(&mut self, position: usize, anchor: Option<usize>) {
        self.caret = CaretState { position, anchor };
        self.caret.clamp(self.len());
    }

    /// Run `f` so that every edit it makes undoes as one step
    pub fn transaction<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        if self.open_group.is_some() {
            return f(self);
        }
        self.next_group += 1;
        self.open_group = Some(self.next_group);
        let result = f(self);
        self.open_group = None;
        result
    }

    /// Undo the most recent edit group
    pub fn undo(&mut self) -> Option<ChangeEvent> {
        let group = self.undo_stack.back()?.group;
        let len_before = self.len();
        let mut affected: Option<Range<usize>> = None;
        let mut caret = self.caret;

        while self.undo_stack.back().map(|e| e.group) == Some(group) {
            let Some(edit) = self.undo_stack.pop_back() else {
                break;
            };
            let end = edit.position + edit.inserted_len();
            self.splice(edit.position..end, &edit.deleted, false);
            affected = Some(union(affected, edit.position..edit.position + edit.deleted_len()));
            caret = edit.caret_before;
            self.redo_stack.push_back(edit);
        }

        self.caret = caret;
        self.caret.clamp(self.len());
        affected.map(|range| self.replay_event(range, len_before))
    }

    /// Redo the most recently undone edit group
    pub fn redo(&mut self) -> Option<ChangeEvent> {
        let group = self.redo_stack.back()?.group;
        let len_before = self.len();
        let mut affected: Option<Range<usize>> = None;

        while self.redo_stack.back().map(|e| e.group) == Some(group) {
            let Some(edit) = self.redo_stack.pop_back() else {
                break;
            };
            let end = edit.position + edit.deleted_len();
            self.splice(edit.position..end, &edit.inserted, false);
            let inserted_end = edit.position + edit.inserted_len();
            affected = Some(union(affected, edit.position..inserted_end));
            self.caret = CaretState::at(inserted_end);
            self.undo_stack.push_back(edit);
        }

        self.caret.clamp(self.len());
        affected.map(|range| self.replay_event(range, len_before))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Empty the document, reset the caret and drop all history
    pub fn clear(&mut self) -> Option<ChangeEvent> {
        let removed = self.len();
        self.content = Rope::new();
        self.caret = CaretState::default();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.open_group = None;
        self.revision += 1;
        (removed > 0).then(|| self.change_event(0..0, removed))
    }

    /// Single mutation primitive: remove `range`, then insert `text` at its start
    fn splice(&mut self, range: Range<usize>, text: &str, record: bool) -> EditOutcome {
        let range = self.clamp_range(range);
        let removed = range.end - range.start;

        let requested = text.chars().count();
        let available = self.max_len.saturating_sub(self.len() - removed);
        let accepted = requested.min(available);
        let text = take_chars(text, accepted);

        let overflow = (accepted < requested).then(|| {
            warn!(
                max_len = self.max_len,
                requested, accepted, "Input truncated at maximum length"
            );
            CapacityExceeded {
                max_len: self.max_len,
                requested,
                accepted,
            }
        });

        if removed == 0 && text.is_empty() {
            return EditOutcome {
                change: None,
                overflow,
            };
        }

        let deleted = if removed > 0 {
            self.content.slice(range.clone()).to_string()
        } else {
            String::new()
        };
        let caret_before = self.caret;

        if removed > 0 {
            self.content.remove(range.clone());
            self.caret.shift_for_delete(&range);
        }
        if !text.is_empty() {
            self.content.insert(range.start, text);
            self.caret.shift_for_insert(range.start, accepted);
        }
        self.caret.clamp(self.len());

        if record {
            let group = match self.open_group {
                Some(group) => group,
                None => {
                    self.next_group += 1;
                    self.next_group
                }
            };
            self.push_undo(Edit {
                position: range.start,
                inserted: text.to_string(),
                deleted,
                group,
                caret_before,
            });
            self.redo_stack.clear();
        }

        self.revision += 1;
        EditOutcome {
            change: Some(self.change_event(range.start..range.start + accepted, removed)),
            overflow,
        }
    }

    fn push_undo(&mut self, edit: Edit) {
        self.undo_stack.push_back(edit);
        while self.undo_stack.len() > MAX_HISTORY {
            let Some(dropped) = self.undo_stack.pop_front() else {
                break;
            };
            // Never keep half a group around
            while self.undo_stack.front().map(|e| e.group) == Some(dropped.group) {
                self.undo_stack.pop_front();
            }
        }
    }

    /// Change event for a replayed group, as one replacement of `range`
    fn replay_event(&self, range: Range<usize>, len_before: usize) -> ChangeEvent {
        let range = self.clamp_range(range);
        let removed = (range.len() + len_before).saturating_sub(self.len());
        self.change_event(range, removed)
    }

    fn change_event(&self, range: Range<usize>, removed: usize) -> ChangeEvent {
        let range = self.clamp_range(range);
        ChangeEvent {
            range,
            removed,
            revision: self.revision,
        }
    }

    fn clamp_range(&self, range: Range<usize>) -> Range<usize> {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        start..end
    }
}

/// Longest prefix of `text` holding at most `n` characters
fn take_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn union(acc: Option<Range<usize>>, range: Range<usize>) -> Range<usize> {
    match acc {
        Some(acc) => acc.start.min(range.start)..acc.end.max(range.end),
        None => range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_moves_caret_after_text() {
        let mut buffer = TextBuffer::new(100);
        let outcome = buffer.insert(0, "Hello");

        assert_eq!(buffer.snapshot(), "Hello");
        assert_eq!(buffer.caret().position, 5);
        let change = outcome.change.unwrap();
        assert_eq!(change.range, 0..5);
        assert_eq!(change.removed, 0);
        assert!(outcome.overflow.is_none());
    }

    #[test]
    fn test_insert_before_caret_shifts_it() {
        let mut buffer = TextBuffer::new(100);
        buffer.insert(0, "world");
        buffer.set_caret(3, None);
        buffer.insert(0, "hi ");
        assert_eq!(buffer.snapshot(), "hi world");
        assert_eq!(buffer.caret().position, 6);

        // Insert after the caret leaves it alone
        buffer.insert(8, "!");
        assert_eq!(buffer.caret().position, 6);
    }

    #[test]
    fn test_insert_exactly_at_capacity() {
        let mut buffer = TextBuffer::new(5);
        let outcome = buffer.insert(0, "abcde");
        assert_eq!(buffer.snapshot(), "abcde");
        assert!(outcome.overflow.is_none());

        let outcome = buffer.insert(5, "f");
        assert_eq!(buffer.len(), 5);
        assert!(outcome.change.is_none());
        assert_eq!(
            outcome.overflow,
            Some(CapacityExceeded {
                max_len: 5,
                requested: 1,
                accepted: 0
            })
        );
    }

    #[test]
    fn test_truncation_keeps_whole_characters() {
        let mut buffer = TextBuffer::new(3);
        let outcome = buffer.insert(0, "a€😀z");
        assert_eq!(buffer.snapshot(), "a€😀");
        assert_eq!(outcome.overflow.unwrap().accepted, 3);
    }

    #[test]
    fn test_delete_clamps_range_and_caret() {
        let mut buffer = TextBuffer::new(100);
        buffer.insert(0, "abcdef");
        let change = buffer.delete(4..50).unwrap();
        assert_eq!(buffer.snapshot(), "abcd");
        assert_eq!(change.removed, 2);
        assert_eq!(buffer.caret().position, 4);

        assert!(buffer.delete(10..20).is_none());
    }

    #[test]
    fn test_set_caret_clamps() {
        let mut buffer = TextBuffer::new(100);
        buffer.insert(0, "abc");
        buffer.set_caret(99, Some(42));
        assert_eq!(buffer.caret().position, 3);
        assert_eq!(buffer.caret().anchor, Some(3));
    }

    #[test]
    fn test_replace_selection() {
        let mut buffer = TextBuffer::new(100);
        buffer.insert(0, "let x = 1;");
        buffer.set_caret(4, Some(5));
        buffer.replace_selection("value");
        assert_eq!(buffer.snapshot(), "let value = 1;");
        assert_eq!(buffer.caret(), CaretState::at(9));
    }

    #[test]
    fn test_backspace_and_delete_forward() {
        let mut buffer = TextBuffer::new(100);
        buffer.insert(0, "abc");
        buffer.backspace();
        assert_eq!(buffer.snapshot(), "ab");

        buffer.set_caret(0, None);
        buffer.delete_forward();
        assert_eq!(buffer.snapshot(), "b");
        assert_eq!(buffer.caret().position, 0);

        assert!(buffer.backspace().is_none());
    }

    #[test]
    fn test_undo_redo() {
        let mut buffer = TextBuffer::new(100);

        buffer.insert(0, "Hello");
        buffer.insert(5, " World");
        assert_eq!(buffer.snapshot(), "Hello World");

        let undone = buffer.undo().unwrap();
        assert_eq!(buffer.snapshot(), "Hello");
        assert_eq!(buffer.caret().position, 5);
        assert_eq!((undone.range, undone.removed), (5..5, 6));

        let redone = buffer.redo().unwrap();
        assert_eq!(buffer.snapshot(), "Hello World");
        assert_eq!(buffer.caret().position, 11);
        assert_eq!((redone.range, redone.removed), (5..11, 0));
    }

    #[test]
    fn test_transaction_undoes_as_one_step() {
        let mut buffer = TextBuffer::new(100);
        buffer.insert(0, "    x");
        buffer.transaction(|b| {
            b.insert(5, "\n");
            b.insert(6, "    ");
        });
        assert_eq!(buffer.snapshot(), "    x\n    ");

        let undone = buffer.undo().unwrap();
        assert_eq!(buffer.snapshot(), "    x");
        assert_eq!(undone.removed, 5);
        assert!(buffer.can_undo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut buffer = TextBuffer::new(100);
        buffer.insert(0, "a");
        buffer.undo();
        assert!(buffer.can_redo());
        buffer.insert(0, "b");
        assert!(!buffer.can_redo());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut buffer = TextBuffer::new(100);
        buffer.insert(0, "abc");
        let revision = buffer.revision();

        let change = buffer.clear().unwrap();
        assert_eq!(change.removed, 3);
        assert!(buffer.is_empty());
        assert_eq!(buffer.caret(), CaretState::default());
        assert!(!buffer.can_undo());
        assert!(buffer.revision() > revision);
    }
}
