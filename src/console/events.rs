//! Event types for the console
//!
//! Every action the presentation layer can report maps to exactly one
//! variant, and each variant to one named handler on the controller.

use std::ops::Range;

/// Toggle controls owned by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    /// Ctrl+R submits the document
    CompileOnCtrlR,
    /// Suggestions are computed on change
    Suggestions,
    /// Newlines copy the previous line's indentation
    AutoIndent,
}

impl Toggle {
    pub fn name(&self) -> &'static str {
        match self {
            Toggle::CompileOnCtrlR => "ctrl-r",
            Toggle::Suggestions => "suggestions",
            Toggle::AutoIndent => "auto-indent",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ctrl-r" | "compile" => Some(Toggle::CompileOnCtrlR),
            "suggestions" | "suggest" => Some(Toggle::Suggestions),
            "auto-indent" | "indent" => Some(Toggle::AutoIndent),
            _ => None,
        }
    }
}

/// Keyboard shortcuts the console reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl+R, submits when the toggle allows it
    CtrlR,
    /// Undo last edit group
    Undo,
    /// Redo last undone group
    Redo,
    /// Accept the selected suggestion
    AcceptSuggestion,
    /// Move the suggestion selection down
    NextSuggestion,
    /// Move the suggestion selection up
    PreviousSuggestion,
    /// Hide the suggestion list
    DismissSuggestions,
}

/// Input reported by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    /// Text typed at the caret, replacing any selection
    Input(String),
    /// Backspace key
    Backspace,
    /// Delete key
    DeleteForward,
    /// Delete an explicit range
    Delete(Range<usize>),
    /// Caret moved by the user
    CaretMoved {
        position: usize,
        anchor: Option<usize>,
    },
    /// Scroll offset changed (drag or programmatic)
    Scrolled { offset: f32, viewport_height: f32 },
    /// Viewport resized
    Resized { viewport_height: f32 },
    /// Keyboard shortcut
    Shortcut(Shortcut),
    /// Submit button
    Submit,
    /// Reset button
    Reset,
    /// Toggle control changed
    Toggled(Toggle, bool),
    /// Help catalog entry chosen
    HelpSelected(usize),
    /// Help catalog entry chosen by title
    HelpNamed(String),
    /// Suggestion at this index chosen directly
    SuggestionChosen(usize),
}
