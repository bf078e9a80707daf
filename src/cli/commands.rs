//! Console command lines
//!
//! Lines starting with `:` are console actions; any other line is typed
//! text followed by Enter. A leading `::` types a literal `:`.

use crate::console::{ConsoleEvent, Shortcut, Toggle};
use crate::error::{ConsoleError, Result};

/// One parsed step of the command loop
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Forward to the controller
    Event(ConsoleEvent),
    /// Type a line carrying its own indentation, then press Enter
    Line(String),
    /// Print the help catalog titles
    ListHelp,
    /// Print the current document
    Show,
    /// Leave the loop
    Quit,
}

/// Parse one input line
pub fn parse_line(line: &str) -> Result<Vec<Command>> {
    let Some(command) = line.strip_prefix(':') else {
        return Ok(vec![Command::Line(line.to_string())]);
    };
    if command.starts_with(':') {
        return Ok(vec![Command::Line(command.to_string())]);
    }

    let mut words = command.split_whitespace();
    let Some(name) = words.next() else {
        return Err(ConsoleError::InvalidCommand("empty command".to_string()));
    };
    let args: Vec<&str> = words.collect();

    let command = match (name, args.as_slice()) {
        ("submit", []) => Command::Event(ConsoleEvent::Submit),
        ("reset", []) => Command::Event(ConsoleEvent::Reset),
        ("ctrl-r", []) => Command::Event(ConsoleEvent::Shortcut(Shortcut::CtrlR)),
        ("undo", []) => Command::Event(ConsoleEvent::Shortcut(Shortcut::Undo)),
        ("redo", []) => Command::Event(ConsoleEvent::Shortcut(Shortcut::Redo)),
        ("next", []) => Command::Event(ConsoleEvent::Shortcut(Shortcut::NextSuggestion)),
        ("prev", []) => Command::Event(ConsoleEvent::Shortcut(Shortcut::PreviousSuggestion)),
        ("dismiss", []) => Command::Event(ConsoleEvent::Shortcut(Shortcut::DismissSuggestions)),
        ("accept", []) => Command::Event(ConsoleEvent::Shortcut(Shortcut::AcceptSuggestion)),
        ("accept", [index]) => Command::Event(ConsoleEvent::SuggestionChosen(number(index)?)),
        ("backspace", []) => Command::Event(ConsoleEvent::Backspace),
        ("delete", []) => Command::Event(ConsoleEvent::DeleteForward),
        ("help", []) => Command::ListHelp,
        ("help", [index]) if index.parse::<usize>().is_ok() => {
            Command::Event(ConsoleEvent::HelpSelected(number(index)?))
        }
        ("help", title) => Command::Event(ConsoleEvent::HelpNamed(title.join(" "))),
        ("show", []) => Command::Show,
        ("quit" | "q", []) => Command::Quit,
        ("toggle", [name, state]) => {
            let toggle = Toggle::from_name(name)
                .ok_or_else(|| ConsoleError::InvalidCommand(format!("unknown toggle '{}'", name)))?;
            Command::Event(ConsoleEvent::Toggled(toggle, switch(state)?))
        }
        ("caret", [position]) => Command::Event(ConsoleEvent::CaretMoved {
            position: number(position)?,
            anchor: None,
        }),
        ("caret", [position, anchor]) => Command::Event(ConsoleEvent::CaretMoved {
            position: number(position)?,
            anchor: Some(number(anchor)?),
        }),
        ("scroll", [offset, height]) => Command::Event(ConsoleEvent::Scrolled {
            offset: float(offset)?,
            viewport_height: float(height)?,
        }),
        _ => {
            return Err(ConsoleError::InvalidCommand(format!(
                "unknown command ':{}'",
                command.trim()
            )))
        }
    };
    Ok(vec![command])
}

fn number(arg: &str) -> Result<usize> {
    arg.parse()
        .map_err(|_| ConsoleError::InvalidCommand(format!("expected a number, got '{}'", arg)))
}

fn float(arg: &str) -> Result<f32> {
    arg.parse()
        .map_err(|_| ConsoleError::InvalidCommand(format!("expected a number, got '{}'", arg)))
}

fn switch(arg: &str) -> Result<bool> {
    match arg {
        "on" | "true" => Ok(true),
        "off" | "false" => Ok(false),
        _ => Err(ConsoleError::InvalidCommand(format!(
            "expected on or off, got '{}'",
            arg
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lines_are_typed() {
        assert_eq!(
            parse_line("    x = 1;").unwrap(),
            vec![Command::Line("    x = 1;".to_string())]
        );
        assert_eq!(parse_line("").unwrap(), vec![Command::Line(String::new())]);
        assert_eq!(
            parse_line("::label").unwrap(),
            vec![Command::Line(":label".to_string())]
        );
    }

    #[test]
    fn test_actions() {
        assert_eq!(parse_line(":submit").unwrap(), vec![Command::Event(ConsoleEvent::Submit)]);
        assert_eq!(
            parse_line(":toggle suggestions off").unwrap(),
            vec![Command::Event(ConsoleEvent::Toggled(Toggle::Suggestions, false))]
        );
        assert_eq!(
            parse_line(":scroll 32 160").unwrap(),
            vec![Command::Event(ConsoleEvent::Scrolled {
                offset: 32.0,
                viewport_height: 160.0
            })]
        );
        assert_eq!(
            parse_line(":help 2").unwrap(),
            vec![Command::Event(ConsoleEvent::HelpSelected(2))]
        );
        assert_eq!(parse_line(":help").unwrap(), vec![Command::ListHelp]);
        assert_eq!(
            parse_line(":help Print  a value").unwrap(),
            vec![Command::Event(ConsoleEvent::HelpNamed("Print a value".to_string()))]
        );
        assert_eq!(parse_line(":q").unwrap(), vec![Command::Quit]);
    }

    #[test]
    fn test_bad_commands() {
        for line in [":", ":frobnicate", ":toggle lasers on", ":toggle indent maybe", ":caret x"] {
            assert!(
                matches!(parse_line(line), Err(ConsoleError::InvalidCommand(_))),
                "{} should be rejected",
                line
            );
        }
    }
}
