//! Terminal front end for the console
//!
//! Everything the `snippet-console` binary needs beyond the library core:
//! a presentation layer for ANSI terminals, a demonstration compiler, and
//! the command loop.

pub mod arithmetic;
pub mod commands;
pub mod display;
pub mod session;
pub mod terminal;

pub use arithmetic::ArithmeticCompiler;
pub use commands::{parse_line, Command};
pub use display::{StderrWarnings, TerminalResultDisplay};
pub use terminal::TerminalPresentation;
