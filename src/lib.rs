//! Snippet Console - interactive code console core
//!
//! Editing and presentation-coordination engine for a small code console:
//! - Bounded text buffer with caret, selection and undo/redo
//! - Line index and line-number gutter kept aligned with scrolling
//! - Syntax highlighting that degrades instead of failing
//! - Ranked completion suggestions (exact prefix, then fuzzy)
//! - Asynchronous submission of snapshots to a pluggable compiler
//!
//! # Example
//!
//! ```ignore
//! use snippet_console::{ConsoleConfig, ConsoleController, ConsoleEvent};
//!
//! let mut console = ConsoleController::new(ConsoleConfig::default(), collaborators)?;
//! console.handle(ConsoleEvent::Input("2+2".to_string()))?;
//! console.handle(ConsoleEvent::Submit)?;
//! console.tick();
//! ```

pub mod cli;
pub mod config;
pub mod console;
pub mod error;

// Re-export commonly used types
pub use config::{ConsoleConfig, HelpEntry};
pub use console::editor::{
    CaretState, ChangeEvent, HighlightPass, Highlighter, LineIndex, StyleTag, StyledSpan,
    Suggestion, SuggestionEngine, SuggestionKind, TextBuffer,
};
pub use console::{
    Collaborators, CompileResult, Compiler, ConsoleController, ConsoleEvent, Diagnostic,
    PresentationLayer, ResultDisplay, Shortcut, SubmissionReport, Toggle, WarningSink,
};
pub use error::{ConsoleError, Result};
