//! Current suggestion list with keyboard selection
//!
//! Volatile: replaced on every refresh and emptied by any edit or caret move.

use super::editor::Suggestion;

#[derive(Debug, Clone, Default)]
pub struct SuggestionList {
    items: Vec<Suggestion>,
    selected: usize,
}

impl SuggestionList {
    /// Replace the list, selecting the top entry
    pub fn show(&mut self, items: Vec<Suggestion>) {
        self.items = items;
        self.selected = 0;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selected = 0;
    }

    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Selected index, if the list is showing
    pub fn selected_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.selected)
    }

    pub fn selected(&self) -> Option<&Suggestion> {
        self.items.get(self.selected)
    }

    pub fn get(&self, index: usize) -> Option<&Suggestion> {
        self.items.get(index)
    }

    /// Move selection down, wrapping
    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.items.len();
    }

    /// Move selection up, wrapping
    pub fn select_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::editor::SuggestionKind;

    #[test]
    fn test_selection_wraps() {
        let mut list = SuggestionList::default();
        assert_eq!(list.selected_index(), None);

        list.show(vec![
            Suggestion::new("for", SuggestionKind::Keyword),
            Suggestion::new("foreach", SuggestionKind::Keyword),
        ]);
        assert_eq!(list.selected_index(), Some(0));

        list.select_previous();
        assert_eq!(list.selected().unwrap().label, "foreach");
        list.select_next();
        assert_eq!(list.selected().unwrap().label, "for");

        list.clear();
        assert!(list.selected().is_none());
    }
}
