//! Console controller
//!
//! Owns the toggle state and the editing components, turns presentation
//! events into buffer mutations, schedules the derived-state refreshes and
//! forwards submissions to the compiler.
//!
//! All of this runs on the host's input loop. The only asynchronous part is
//! the compiler call, whose results are collected by [`ConsoleController::tick`]
//! or [`ConsoleController::next_result`].

use super::editor::{
    CaretState, ChangeEvent, EditOutcome, Gutter, HighlightPass, Highlighter, LineIndex,
    ScrollMetrics, StyledSpan, Suggestion, SuggestionEngine, TextBuffer,
};
use super::events::{ConsoleEvent, Shortcut, Toggle};
use super::help::HelpCatalog;
use super::host::{Collaborators, PresentationLayer, ResultDisplay, WarningSink};
use super::scheduler::RefreshScheduler;
use super::submission::{SubmissionId, SubmissionPipeline, SubmissionReport};
use super::suggestion_list::SuggestionList;
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};
use ropey::Rope;
use std::ops::Range;
use tracing::{debug, info};

/// User-controlled switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleState {
    pub compile_on_ctrl_r: bool,
    pub suggestions_enabled: bool,
    pub auto_indent_enabled: bool,
}

impl ToggleState {
    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self {
            compile_on_ctrl_r: config.compile_on_ctrl_r,
            suggestions_enabled: config.suggestions_enabled,
            auto_indent_enabled: config.auto_indent_enabled,
        }
    }

    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::CompileOnCtrlR => self.compile_on_ctrl_r,
            Toggle::Suggestions => self.suggestions_enabled,
            Toggle::AutoIndent => self.auto_indent_enabled,
        }
    }

    fn set(&mut self, toggle: Toggle, enabled: bool) {
        match toggle {
            Toggle::CompileOnCtrlR => self.compile_on_ctrl_r = enabled,
            Toggle::Suggestions => self.suggestions_enabled = enabled,
            Toggle::AutoIndent => self.auto_indent_enabled = enabled,
        }
    }
}

/// Submission state
///
/// `Submitting` only lasts for the hand-off inside [`ConsoleController::submit`],
/// which returns to `Idle` before it does, so callers always observe `Idle`.
/// Compiles still running are counted by `submissions_in_flight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
}

pub struct ConsoleController {
    config: ConsoleConfig,
    toggles: ToggleState,
    buffer: TextBuffer,
    line_index: LineIndex,
    highlighter: Highlighter,
    highlight: HighlightPass,
    engine: SuggestionEngine,
    suggestions: SuggestionList,
    help: HelpCatalog,
    scheduler: RefreshScheduler,
    scroll: ScrollMetrics,
    submit_state: SubmitState,
    pipeline: SubmissionPipeline,
    presentation: Box<dyn PresentationLayer>,
    display: Box<dyn ResultDisplay>,
    warnings: Box<dyn WarningSink>,
}

impl ConsoleController {
    /// Create a console with an empty document
    pub fn new(config: ConsoleConfig, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;

        let toggles = ToggleState::from_config(&config);
        let mut engine = SuggestionEngine::new(config.max_suggestions);
        engine.set_enabled(toggles.suggestions_enabled);

        Ok(Self {
            toggles,
            buffer: TextBuffer::new(config.max_input_length),
            line_index: LineIndex::new(config.line_height),
            highlighter: Highlighter::new(),
            highlight: HighlightPass::default(),
            engine,
            suggestions: SuggestionList::default(),
            help: HelpCatalog::new(config.help_snippets.clone()),
            scheduler: RefreshScheduler::new(),
            scroll: ScrollMetrics::default(),
            submit_state: SubmitState::Idle,
            pipeline: SubmissionPipeline::new(collaborators.compiler),
            presentation: collaborators.presentation,
            display: collaborators.display,
            warnings: collaborators.warnings,
            config,
        })
    }

    /// Dispatch one presentation event to its handler
    pub fn handle(&mut self, event: ConsoleEvent) -> Result<()> {
        match event {
            ConsoleEvent::Input(text) => self.on_input(&text),
            ConsoleEvent::Backspace => {
                let change = self.buffer.backspace();
                self.apply_change(change);
            }
            ConsoleEvent::DeleteForward => {
                let change = self.buffer.delete_forward();
                self.apply_change(change);
            }
            ConsoleEvent::Delete(range) => self.on_delete(range),
            ConsoleEvent::CaretMoved { position, anchor } => self.on_caret_moved(position, anchor),
            ConsoleEvent::Scrolled {
                offset,
                viewport_height,
            } => self.on_scrolled(offset, viewport_height),
            ConsoleEvent::Resized { viewport_height } => {
                self.scroll.viewport_height = viewport_height;
                self.scheduler.viewport_changed();
            }
            ConsoleEvent::Shortcut(shortcut) => self.on_shortcut(shortcut)?,
            ConsoleEvent::Submit => {
                self.submit()?;
            }
            ConsoleEvent::Reset => self.reset(),
            ConsoleEvent::Toggled(toggle, enabled) => self.set_toggle(toggle, enabled),
            ConsoleEvent::HelpSelected(index) => self.insert_help(index)?,
            ConsoleEvent::HelpNamed(title) => self.insert_help_titled(&title)?,
            ConsoleEvent::SuggestionChosen(index) => self.accept_suggestion(index)?,
        }

        if !self.config.defer_refresh {
            self.flush();
        }
        Ok(())
    }

    /// Once per loop iteration: run pending refreshes and deliver results
    pub fn tick(&mut self) {
        self.flush();
        self.poll_results();
    }

    /// Run pending refreshes and redraw what they touched
    pub fn flush(&mut self) {
        let pending = self.scheduler.take();
        if pending.is_empty() {
            return;
        }

        let document = self.buffer.snapshot();
        let caret = self.buffer.caret();
        debug!(
            text = pending.text,
            caret = pending.caret,
            viewport = pending.viewport,
            dirty = ?pending.dirty,
            "Refreshing console"
        );

        if pending.text {
            self.line_index.rebuild(&document);
            self.highlight = self.highlighter.highlight(&document);
        }
        if pending.suggestions() {
            self.refresh_suggestions(&document, caret);
        }

        if pending.text || pending.caret {
            self.presentation.render_text(&document, caret);
        }
        if pending.text {
            self.presentation
                .render_highlight(&document, &self.highlight.spans);
        }
        if pending.text || pending.viewport {
            let gutter = self.gutter();
            self.presentation.render_line_numbers(&gutter);
        }
        if pending.suggestions() {
            self.render_suggestions();
        }
    }

    /// Redraw every layer from current state
    pub fn redraw(&mut self) {
        let document = self.buffer.snapshot();
        self.presentation.render_text(&document, self.buffer.caret());
        self.presentation
            .render_highlight(&document, &self.highlight.spans);
        let gutter = self.gutter();
        self.presentation.render_line_numbers(&gutter);
        self.render_suggestions();
    }

    /// Submit the current document to the compiler
    ///
    /// The snapshot is taken now; later edits do not affect it.
    pub fn submit(&mut self) -> Result<SubmissionId> {
        self.submit_state = SubmitState::Submitting;
        let result = self
            .pipeline
            .submit(self.buffer.snapshot(), self.buffer.revision());
        // Editing never waits on the compiler
        self.submit_state = SubmitState::Idle;
        result
    }

    /// Empty the document and drop every derived cache
    pub fn reset(&mut self) {
        info!("Resetting console");
        self.buffer.clear();
        self.line_index.rebuild("");
        self.highlight = HighlightPass::default();
        self.suggestions.clear();
        self.scheduler.clear();
        self.scroll.offset = 0.0;
        self.redraw();
    }

    pub fn set_toggle(&mut self, toggle: Toggle, enabled: bool) {
        debug!(toggle = toggle.name(), enabled, "Toggle changed");
        self.toggles.set(toggle, enabled);

        if toggle == Toggle::Suggestions {
            self.engine.set_enabled(enabled);
            if enabled {
                self.scheduler.caret_moved();
            } else {
                self.suggestions.clear();
                self.render_suggestions();
            }
        }
    }

    /// Insert help entry `index` verbatim at the caret
    pub fn insert_help(&mut self, index: usize) -> Result<()> {
        let snippet = self
            .help
            .lookup(index)
            .ok_or_else(|| ConsoleError::InvalidSelection(format!("help entry {}", index)))?
            .to_string();
        self.insert_snippet(&snippet);
        Ok(())
    }

    /// Insert the help entry titled `title` (any case) verbatim at the caret
    pub fn insert_help_titled(&mut self, title: &str) -> Result<()> {
        let snippet = self
            .help
            .lookup_by_title(title)
            .ok_or_else(|| ConsoleError::InvalidSelection(format!("help entry '{}'", title)))?
            .to_string();
        self.insert_snippet(&snippet);
        Ok(())
    }

    fn insert_snippet(&mut self, snippet: &str) {
        self.suggestions.clear();
        let outcome = self.buffer.replace_selection(snippet);
        self.apply(outcome);
    }

    /// Accept suggestion `index` from the current list
    pub fn accept_suggestion(&mut self, index: usize) -> Result<()> {
        let suggestion = self
            .suggestions
            .get(index)
            .cloned()
            .ok_or_else(|| ConsoleError::InvalidSelection(format!("suggestion {}", index)))?;
        self.suggestions.clear();
        let outcome = self.engine.accept(&mut self.buffer, &suggestion);
        self.apply(outcome);
        Ok(())
    }

    /// Deliver results that have already arrived
    pub fn poll_results(&mut self) {
        for report in self.pipeline.poll() {
            self.deliver(&report);
        }
    }

    /// Wait for the next result and deliver it
    pub async fn next_result(&mut self) -> Option<SubmissionReport> {
        let report = self.pipeline.next().await?;
        self.deliver(&report);
        Some(report)
    }

    pub fn document(&self) -> String {
        self.buffer.snapshot()
    }

    pub fn caret(&self) -> CaretState {
        self.buffer.caret()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn spans(&self) -> &[StyledSpan] {
        &self.highlight.spans
    }

    pub fn highlight_pass(&self) -> &HighlightPass {
        &self.highlight
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Line-number column for the current scroll position
    pub fn gutter(&self) -> Gutter {
        self.line_index.gutter(self.scroll)
    }

    pub fn scroll(&self) -> ScrollMetrics {
        self.scroll
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        self.suggestions.items()
    }

    pub fn selected_suggestion(&self) -> Option<&Suggestion> {
        self.suggestions.selected()
    }

    pub fn toggles(&self) -> ToggleState {
        self.toggles
    }

    /// Always `Idle` between calls; see [`SubmitState`]
    pub fn submit_state(&self) -> SubmitState {
        self.submit_state
    }

    pub fn help(&self) -> &HelpCatalog {
        &self.help
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn is_refresh_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Highlight passes run so far
    pub fn highlight_passes(&self) -> u64 {
        self.highlighter.passes()
    }

    /// Suggestion passes computed so far
    pub fn suggestion_passes(&self) -> u64 {
        self.engine.computations()
    }

    pub fn submissions_in_flight(&self) -> usize {
        self.pipeline.in_flight()
    }

    fn on_input(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.suggestions.clear();

        if text == "\n" && self.toggles.auto_indent_enabled {
            for outcome in self.insert_newline_with_indent() {
                self.apply(outcome);
            }
        } else {
            let outcome = self.buffer.replace_selection(text);
            self.apply(outcome);
        }
    }

    /// Newline plus the split line's leading whitespace, undone as one edit
    fn insert_newline_with_indent(&mut self) -> Vec<EditOutcome> {
        let caret = self.buffer.caret();
        let split_at = caret.selection().map_or(caret.position, |range| range.start);
        let indent = leading_whitespace(self.buffer.rope(), split_at);

        self.buffer.transaction(|buffer| {
            let newline = buffer.replace_selection("\n");
            let inserted = newline.change.is_some();
            let mut outcomes = vec![newline];
            if inserted && !indent.is_empty() {
                let at = buffer.caret().position;
                outcomes.push(buffer.insert(at, &indent));
            }
            outcomes
        })
    }

    fn on_delete(&mut self, range: Range<usize>) {
        self.suggestions.clear();
        let change = self.buffer.delete(range);
        self.apply_change(change);
    }

    fn on_caret_moved(&mut self, position: usize, anchor: Option<usize>) {
        self.buffer.set_caret(position, anchor);
        self.suggestions.clear();
        self.scheduler.caret_moved();
    }

    fn on_scrolled(&mut self, offset: f32, viewport_height: f32) {
        self.scroll = ScrollMetrics {
            offset,
            viewport_height,
        };
        self.scheduler.viewport_changed();
    }

    fn on_shortcut(&mut self, shortcut: Shortcut) -> Result<()> {
        match shortcut {
            Shortcut::CtrlR => {
                if self.toggles.compile_on_ctrl_r {
                    self.submit()?;
                } else {
                    debug!("Ctrl+R ignored, shortcut disabled");
                }
            }
            Shortcut::Undo => {
                self.suggestions.clear();
                let change = self.buffer.undo();
                self.apply_change(change);
            }
            Shortcut::Redo => {
                self.suggestions.clear();
                let change = self.buffer.redo();
                self.apply_change(change);
            }
            Shortcut::AcceptSuggestion => {
                if let Some(index) = self.suggestions.selected_index() {
                    self.accept_suggestion(index)?;
                }
            }
            Shortcut::NextSuggestion => {
                self.suggestions.select_next();
                self.render_suggestions();
            }
            Shortcut::PreviousSuggestion => {
                self.suggestions.select_previous();
                self.render_suggestions();
            }
            Shortcut::DismissSuggestions => {
                self.suggestions.clear();
                self.render_suggestions();
            }
        }
        Ok(())
    }

    fn refresh_suggestions(&mut self, document: &str, caret: CaretState) {
        if !self.toggles.suggestions_enabled || caret.has_selection() {
            self.suggestions.clear();
            return;
        }
        let items = self.engine.suggest(document, caret.position);
        self.suggestions.show(items);
    }

    fn render_suggestions(&mut self) {
        self.presentation
            .render_suggestions(self.suggestions.items(), self.suggestions.selected_index());
    }

    fn apply(&mut self, outcome: EditOutcome) {
        if let Some(overflow) = &outcome.overflow {
            self.warnings.capacity_reached(overflow);
        }
        self.apply_change(outcome.change);
    }

    fn apply_change(&mut self, change: Option<ChangeEvent>) {
        if let Some(change) = change {
            self.scheduler.text_changed(&change);
        }
    }

    fn deliver(&mut self, report: &SubmissionReport) {
        debug!(id = report.id, "Delivering result to display");
        self.display.show_result(report);
    }
}

/// Spaces and tabs at the start of the line containing `at`, up to `at`
fn leading_whitespace(rope: &Rope, at: usize) -> String {
    let at = at.min(rope.len_chars());
    let mut start = at;
    while start > 0 && rope.char(start - 1) != '\n' {
        start -= 1;
    }
    rope.slice(start..at)
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}
