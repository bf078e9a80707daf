//! Line-driven command loop
//!
//! Reads lines, feeds them to the controller and ticks it. Results are
//! picked up on a short interval so they show without waiting for the next
//! line of input.

use super::commands::{parse_line, Command};
use crate::console::{ConsoleController, ConsoleEvent};
use crate::error::Result;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

const RESULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run until `:quit` or end of input, then wait for outstanding results
pub async fn run<R, W>(console: &mut ConsoleController, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut poll = tokio::time::interval(RESULT_POLL_INTERVAL);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("End of input");
                    break;
                };
                if !process_line(console, &line, out)? {
                    break;
                }
                console.tick();
            }
            _ = poll.tick() => console.poll_results(),
        }
    }

    console.tick();
    while console.next_result().await.is_some() {}
    Ok(())
}

/// Apply one line; false when the loop should stop
pub fn process_line<W: Write>(console: &mut ConsoleController, line: &str, out: &mut W) -> Result<bool> {
    let commands = match parse_line(line) {
        Ok(commands) => commands,
        Err(err) => {
            writeln!(out, "{}", err)?;
            return Ok(true);
        }
    };

    for command in commands {
        let events = match command {
            Command::Event(event) => vec![event],
            Command::Line(text) => typed_line(console, text),
            Command::ListHelp => {
                for (i, title) in console.help().titles().enumerate() {
                    writeln!(out, "{:>2}  {}", i, title)?;
                }
                continue;
            }
            Command::Show => {
                writeln!(out, "{}", console.document())?;
                continue;
            }
            Command::Quit => return Ok(false),
        };

        for event in events {
            if let Err(err) = console.handle(event) {
                warn!("Console action failed: {}", err);
                writeln!(out, "{}", err)?;
                break;
            }
        }
    }
    Ok(true)
}

/// Events for typing `text` and pressing Enter
///
/// A line arrives with its own indentation, so whitespace auto-indent left
/// before the caret is replaced rather than added to.
fn typed_line(console: &ConsoleController, text: String) -> Vec<ConsoleEvent> {
    let mut events = Vec::with_capacity(4);
    let caret = console.caret();
    if !caret.has_selection() {
        let rope = console.buffer().rope();
        let mut start = caret.position;
        while start > 0 && rope.char(start - 1) != '\n' {
            start -= 1;
        }
        let indent_only = start < caret.position
            && rope
                .slice(start..caret.position)
                .chars()
                .all(|c| c == ' ' || c == '\t');
        if indent_only {
            events.push(ConsoleEvent::CaretMoved {
                position: caret.position,
                anchor: Some(start),
            });
            events.push(ConsoleEvent::Backspace);
        }
    }
    if !text.is_empty() {
        events.push(ConsoleEvent::Input(text));
    }
    events.push(ConsoleEvent::Input("\n".to_string()));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ArithmeticCompiler, StderrWarnings, TerminalPresentation, TerminalResultDisplay};
    use crate::config::ConsoleConfig;
    use crate::console::Collaborators;
    use std::sync::Arc;

    fn console(config: ConsoleConfig) -> ConsoleController {
        let collaborators = Collaborators {
            presentation: Box::new(TerminalPresentation::new(Vec::new(), false)),
            compiler: Arc::new(ArithmeticCompiler),
            display: Box::new(TerminalResultDisplay::new(Vec::new(), false, false)),
            warnings: Box::new(StderrWarnings::default()),
        };
        ConsoleController::new(config, collaborators).unwrap()
    }

    fn feed(console: &mut ConsoleController, lines: &[&str]) -> Vec<u8> {
        let mut out = Vec::new();
        for line in lines {
            assert!(process_line(console, line, &mut out).unwrap());
            console.tick();
        }
        out
    }

    #[test]
    fn test_indented_lines_keep_their_own_indentation() {
        let mut console = console(ConsoleConfig::default());
        let out = feed(&mut console, &["if (x) {", "    a = 1;", "    b = 2;", "}"]);

        assert!(out.is_empty());
        assert_eq!(console.document(), "if (x) {\n    a = 1;\n    b = 2;\n}\n");
    }

    #[test]
    fn test_blank_line_drops_carried_indent() {
        let mut console = console(ConsoleConfig::default());
        feed(&mut console, &["\tx = 1;", "", "\ty = 2;"]);
        assert_eq!(console.document(), "\tx = 1;\n\n\ty = 2;\n\t");
    }

    #[test]
    fn test_lines_typed_without_auto_indent() {
        let config = ConsoleConfig {
            auto_indent_enabled: false,
            ..ConsoleConfig::default()
        };
        let mut console = console(config);
        feed(&mut console, &["  a", "  b"]);
        assert_eq!(console.document(), "  a\n  b\n");
    }

    #[test]
    fn test_commands_and_errors() {
        let mut console = console(ConsoleConfig::default());
        let mut out = Vec::new();
        assert!(process_line(&mut console, "abc", &mut out).unwrap());
        assert!(process_line(&mut console, ":show", &mut out).unwrap());
        assert!(process_line(&mut console, ":help 99", &mut out).unwrap());
        assert!(process_line(&mut console, ":nope", &mut out).unwrap());
        assert!(!process_line(&mut console, ":quit", &mut out).unwrap());

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("abc\n"));
        assert!(out.contains("Invalid selection: help entry 99"));
        assert!(out.contains("Invalid command"));
    }
}
