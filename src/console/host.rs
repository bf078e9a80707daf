//! Collaborator contracts
//!
//! The console core talks to everything outside of it through these traits:
//! the presentation layer that draws it, the compiler that runs snippets,
//! the display that shows results and the sink for capacity warnings.

use super::editor::{CapacityExceeded, CaretState, Gutter, StyledSpan, Suggestion};
use super::submission::SubmissionReport;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Diagnostic reported by the compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    /// Character offset into the submitted source, when known
    pub offset: Option<usize>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offset: None,
        }
    }

    pub fn at(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset: Some(offset),
        }
    }
}

/// Outcome of compiling and running one snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResult {
    pub success: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub output: Option<String>,
}

impl CompileResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            diagnostics: Vec::new(),
            output: Some(output.into()),
        }
    }

    pub fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            success: false,
            diagnostics,
            output: None,
        }
    }

    /// User-facing text for this result
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        if let Some(output) = &self.output {
            lines.push(output.clone());
        }
        for diagnostic in &self.diagnostics {
            match diagnostic.offset {
                Some(offset) => lines.push(format!("error at {}: {}", offset, diagnostic.message)),
                None => lines.push(format!("error: {}", diagnostic.message)),
            }
        }
        if lines.is_empty() {
            lines.push(if self.success { "ok" } else { "failed" }.to_string());
        }
        lines.join("\n")
    }
}

/// Draws the console
pub trait PresentationLayer {
    /// Editable raw text layer and caret
    fn render_text(&mut self, raw: &str, caret: CaretState);

    /// Highlight overlay drawn exactly over the raw text
    fn render_highlight(&mut self, raw: &str, spans: &[StyledSpan]);

    /// Line-number column
    fn render_line_numbers(&mut self, gutter: &Gutter);

    /// Suggestion list; empty hides it
    fn render_suggestions(&mut self, suggestions: &[Suggestion], selected: Option<usize>);
}

/// Compiles and runs a snippet
#[async_trait]
pub trait Compiler: Send + Sync {
    async fn compile(&self, source: String) -> CompileResult;
}

/// Shows compile results to the user
pub trait ResultDisplay {
    fn show_result(&mut self, report: &SubmissionReport);
}

/// Receives capacity warnings
pub trait WarningSink {
    fn capacity_reached(&mut self, warning: &CapacityExceeded);
}

/// Text of the capacity warning
pub fn capacity_message(warning: &CapacityExceeded) -> String {
    format!(
        "Reached maximum input length! ({} characters, {} of {} new characters kept)",
        warning.max_len, warning.accepted, warning.requested
    )
}

/// Warning sink that only logs
#[derive(Debug, Default)]
pub struct LogWarnings;

impl WarningSink for LogWarnings {
    fn capacity_reached(&mut self, warning: &CapacityExceeded) {
        warn!("{}", capacity_message(warning));
    }
}

/// Everything the controller needs from the outside
pub struct Collaborators {
    pub presentation: Box<dyn PresentationLayer>,
    pub compiler: Arc<dyn Compiler>,
    pub display: Box<dyn ResultDisplay>,
    pub warnings: Box<dyn WarningSink>,
}
