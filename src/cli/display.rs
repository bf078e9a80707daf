//! Result display and capacity warnings for the terminal

use crate::console::editor::CapacityExceeded;
use crate::console::{capacity_message, ResultDisplay, SubmissionReport, WarningSink};
use crate::error::{ConsoleError, Result};
use crossterm::style::Stylize;
use std::io::Write;
use tracing::warn;

/// Prints each result as text or as one JSON object per line
pub struct TerminalResultDisplay<W: Write> {
    out: W,
    json: bool,
    color: bool,
}

impl<W: Write> TerminalResultDisplay<W> {
    pub fn new(out: W, json: bool, color: bool) -> Self {
        Self { out, json, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn format(&self, report: &SubmissionReport) -> String {
        if self.json {
            return json_line(report).unwrap_or_else(|err| error_line(&err));
        }

        let mut header = format!("[#{}]", report.id);
        if report.superseded {
            header.push_str(" (superseded)");
        }
        let header = match (self.color, report.result.success) {
            (false, _) => header,
            (true, true) => header.green().to_string(),
            (true, false) => header.red().to_string(),
        };
        format!("{} {}", header, report.result.summary())
    }
}

fn json_line(report: &SubmissionReport) -> Result<String> {
    Ok(serde_json::to_string(report)?)
}

fn error_line(err: &ConsoleError) -> String {
    serde_json::json!({ "error": err.to_string() }).to_string()
}

impl<W: Write> ResultDisplay for TerminalResultDisplay<W> {
    fn show_result(&mut self, report: &SubmissionReport) {
        let line = self.format(report);
        if let Err(err) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            warn!("Failed to write result: {}", err);
        }
    }
}

/// Capacity warnings printed to stderr
#[derive(Debug, Default)]
pub struct StderrWarnings {
    pub color: bool,
}

impl WarningSink for StderrWarnings {
    fn capacity_reached(&mut self, warning: &CapacityExceeded) {
        let message = capacity_message(warning);
        if self.color {
            eprintln!("{}", message.yellow());
        } else {
            eprintln!("{}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{CompileResult, Diagnostic};
    use std::sync::Arc;

    fn report(result: CompileResult, superseded: bool) -> SubmissionReport {
        SubmissionReport {
            id: 3,
            source: Arc::from("2+2"),
            revision: 1,
            result,
            superseded,
        }
    }

    #[test]
    fn test_text_output() {
        let mut display = TerminalResultDisplay::new(Vec::new(), false, false);
        display.show_result(&report(CompileResult::ok("4"), false));
        display.show_result(&report(
            CompileResult::failed(vec![Diagnostic::at("division by zero", 2)]),
            true,
        ));

        let out = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(
            out,
            "[#3] 4\n[#3] (superseded) error at 2: division by zero\n"
        );
    }

    #[test]
    fn test_json_output() {
        let mut display = TerminalResultDisplay::new(Vec::new(), true, false);
        display.show_result(&report(CompileResult::ok("4"), false));

        let out = String::from_utf8(display.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["source"], "2+2");
        assert_eq!(value["result"]["output"], "4");
        assert_eq!(value["superseded"], false);
    }

    #[test]
    fn test_error_line_is_valid_json() {
        let err = ConsoleError::InvalidCommand("unknown command ':say \"hi\" \\ now'".to_string());
        let value: serde_json::Value = serde_json::from_str(&error_line(&err)).unwrap();
        assert_eq!(
            value["error"],
            "Invalid command: unknown command ':say \"hi\" \\ now'"
        );
    }
}
