//! Editing core for the console
//!
//! Text buffer, line index, highlighter and suggestion engine. None of these
//! know about each other's caches; the controller wires them together.

mod buffer;
mod completion;
mod cursor;
mod highlight;
mod line_index;
pub mod syntax;

pub use buffer::{CapacityExceeded, ChangeEvent, Edit, EditOutcome, TextBuffer};
pub use completion::{Suggestion, SuggestionEngine, SuggestionKind, TokenContext};
pub use cursor::CaretState;
pub use highlight::{HighlightPass, Highlighter, StyledSpan};
pub use line_index::{Gutter, LineIndex, ScrollMetrics};
pub use syntax::StyleTag;
