//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use snippet_console::console::editor::{CapacityExceeded, Gutter};
use snippet_console::{
    cli::ArithmeticCompiler, CaretState, Collaborators, CompileResult, Compiler, ConsoleConfig,
    ConsoleController, PresentationLayer, ResultDisplay, StyledSpan, SubmissionReport, Suggestion,
    WarningSink,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Everything the fakes observed, shared with the test body
#[derive(Debug, Default)]
pub struct Recorded {
    pub text_renders: Vec<(String, CaretState)>,
    pub highlight_renders: Vec<Vec<StyledSpan>>,
    pub gutters: Vec<Gutter>,
    pub suggestion_renders: Vec<Vec<String>>,
    pub results: Vec<SubmissionReport>,
    pub warnings: Vec<CapacityExceeded>,
    pub compiled: Vec<String>,
}

pub type Shared = Arc<Mutex<Recorded>>;

pub struct RecordingPresentation(pub Shared);

impl PresentationLayer for RecordingPresentation {
    fn render_text(&mut self, raw: &str, caret: CaretState) {
        self.0.lock().unwrap().text_renders.push((raw.to_string(), caret));
    }

    fn render_highlight(&mut self, _raw: &str, spans: &[StyledSpan]) {
        self.0.lock().unwrap().highlight_renders.push(spans.to_vec());
    }

    fn render_line_numbers(&mut self, gutter: &Gutter) {
        self.0.lock().unwrap().gutters.push(gutter.clone());
    }

    fn render_suggestions(&mut self, suggestions: &[Suggestion], _selected: Option<usize>) {
        let labels = suggestions.iter().map(|s| s.label.clone()).collect();
        self.0.lock().unwrap().suggestion_renders.push(labels);
    }
}

pub struct RecordingDisplay(pub Shared);

impl ResultDisplay for RecordingDisplay {
    fn show_result(&mut self, report: &SubmissionReport) {
        self.0.lock().unwrap().results.push(report.clone());
    }
}

pub struct RecordingWarnings(pub Shared);

impl WarningSink for RecordingWarnings {
    fn capacity_reached(&mut self, warning: &CapacityExceeded) {
        self.0.lock().unwrap().warnings.push(*warning);
    }
}

/// Arithmetic compiler that also records what it was given
pub struct RecordingCompiler {
    pub shared: Shared,
    pub delay: Duration,
}

#[async_trait]
impl Compiler for RecordingCompiler {
    async fn compile(&self, source: String) -> CompileResult {
        self.shared.lock().unwrap().compiled.push(source.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        ArithmeticCompiler.compile(source).await
    }
}

/// Console wired to recording fakes
pub fn console_with(config: ConsoleConfig) -> (ConsoleController, Shared) {
    console_with_delay(config, Duration::ZERO)
}

pub fn console_with_delay(config: ConsoleConfig, delay: Duration) -> (ConsoleController, Shared) {
    let shared = Shared::default();
    let collaborators = Collaborators {
        presentation: Box::new(RecordingPresentation(Arc::clone(&shared))),
        compiler: Arc::new(RecordingCompiler {
            shared: Arc::clone(&shared),
            delay,
        }),
        display: Box::new(RecordingDisplay(Arc::clone(&shared))),
        warnings: Box::new(RecordingWarnings(Arc::clone(&shared))),
    };
    let console = ConsoleController::new(config, collaborators).expect("valid test config");
    (console, shared)
}

/// Default console wired to recording fakes
pub fn console() -> (ConsoleController, Shared) {
    console_with(ConsoleConfig::default())
}
