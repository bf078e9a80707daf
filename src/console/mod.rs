//! Interactive code console
//!
//! Editing core plus the controller that ties it to a presentation layer
//! and a compiler:
//! - Character-bounded text buffer with caret, selection and undo
//! - Line index with a scroll-aligned gutter
//! - Lexer-driven syntax highlighting
//! - Keyword, type and document-symbol suggestions
//! - Non-blocking snippet submission
//!
//! The binary drives it from stdin; hosts embed it through [`Collaborators`].

pub mod editor;

mod controller;
mod events;
mod help;
mod host;
mod scheduler;
mod submission;
mod suggestion_list;

pub use controller::{ConsoleController, SubmitState, ToggleState};
pub use events::{ConsoleEvent, Shortcut, Toggle};
pub use help::HelpCatalog;
pub use host::{
    capacity_message, Collaborators, CompileResult, Compiler, Diagnostic, LogWarnings,
    PresentationLayer, ResultDisplay, WarningSink,
};
pub use scheduler::{PendingRefresh, RefreshScheduler};
pub use submission::{SubmissionId, SubmissionPipeline, SubmissionReport};
pub use suggestion_list::SuggestionList;
