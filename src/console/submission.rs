//! Submission pipeline
//!
//! Hands document snapshots to the compiler without blocking the input loop.
//! Each submission runs on its own task; results come back over a channel
//! and are picked up by the controller on its own thread.

use super::host::{CompileResult, Compiler, Diagnostic};
use crate::error::{ConsoleError, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Identifier of one submission, increasing per console
pub type SubmissionId = u64;

/// Result delivered for one submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReport {
    pub id: SubmissionId,
    /// Exact text that was submitted
    pub source: Arc<str>,
    /// Buffer revision the snapshot was taken at
    pub revision: u64,
    pub result: CompileResult,
    /// A newer submission was started before this result arrived
    pub superseded: bool,
}

struct Completed {
    id: SubmissionId,
    source: Arc<str>,
    revision: u64,
    result: CompileResult,
}

pub struct SubmissionPipeline {
    compiler: Arc<dyn Compiler>,
    tx: mpsc::UnboundedSender<Completed>,
    rx: mpsc::UnboundedReceiver<Completed>,
    last_id: SubmissionId,
    in_flight: usize,
}

impl SubmissionPipeline {
    pub fn new(compiler: Arc<dyn Compiler>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            compiler,
            tx,
            rx,
            last_id: 0,
            in_flight: 0,
        }
    }

    /// Dispatch `source` to the compiler (non-blocking)
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::RuntimeUnavailable`] when called outside a
    /// tokio runtime.
    pub fn submit(&mut self, source: String, revision: u64) -> Result<SubmissionId> {
        let handle = Handle::try_current().map_err(|_| ConsoleError::RuntimeUnavailable)?;

        self.last_id += 1;
        let id = self.last_id;
        let source: Arc<str> = Arc::from(source);
        let compiler = Arc::clone(&self.compiler);
        let tx = self.tx.clone();

        info!(id, revision, chars = source.chars().count(), "Submitting snippet");

        let task_source = Arc::clone(&source);
        handle.spawn(async move {
            let input = task_source.to_string();
            // Run on a child task so a panicking compiler still yields a result
            let result = match tokio::spawn(async move { compiler.compile(input).await }).await {
                Ok(result) => result,
                Err(err) => {
                    warn!(id, "Compiler task failed: {}", err);
                    CompileResult::failed(vec![Diagnostic::new(format!(
                        "compiler crashed: {}",
                        err
                    ))])
                }
            };

            if tx
                .send(Completed {
                    id,
                    source: task_source,
                    revision,
                    result,
                })
                .is_err()
            {
                debug!(id, "Console dropped before result arrived");
            }
        });

        self.in_flight += 1;
        Ok(id)
    }

    /// Results that have arrived so far (non-blocking)
    pub fn poll(&mut self) -> Vec<SubmissionReport> {
        let mut reports = Vec::new();
        while let Ok(completed) = self.rx.try_recv() {
            reports.push(self.report(completed));
        }
        reports
    }

    /// Wait for the next result
    ///
    /// Returns None when nothing is in flight.
    pub async fn next(&mut self) -> Option<SubmissionReport> {
        if self.in_flight == 0 {
            return None;
        }
        let completed = self.rx.recv().await?;
        Some(self.report(completed))
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn report(&mut self, completed: Completed) -> SubmissionReport {
        self.in_flight = self.in_flight.saturating_sub(1);
        let superseded = completed.id < self.last_id;
        info!(
            id = completed.id,
            success = completed.result.success,
            superseded,
            "Snippet result arrived"
        );
        SubmissionReport {
            id: completed.id,
            source: completed.source,
            revision: completed.revision,
            result: completed.result,
            superseded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl Compiler for Echo {
        async fn compile(&self, source: String) -> CompileResult {
            CompileResult::ok(source)
        }
    }

    struct Panics;

    #[async_trait]
    impl Compiler for Panics {
        async fn compile(&self, _source: String) -> CompileResult {
            panic!("compiler exploded")
        }
    }

    #[test]
    fn test_submit_needs_runtime() {
        let mut pipeline = SubmissionPipeline::new(Arc::new(Echo));
        let err = pipeline.submit("1".to_string(), 0).unwrap_err();
        assert!(matches!(err, ConsoleError::RuntimeUnavailable));
        assert_eq!(pipeline.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_result_carries_snapshot() {
        let mut pipeline = SubmissionPipeline::new(Arc::new(Echo));
        let id = pipeline.submit("2+2".to_string(), 7).unwrap();

        let report = pipeline.next().await.unwrap();
        assert_eq!(report.id, id);
        assert_eq!(&*report.source, "2+2");
        assert_eq!(report.revision, 7);
        assert!(!report.superseded);
        assert_eq!(pipeline.in_flight(), 0);
        assert!(pipeline.next().await.is_none());
    }

    #[tokio::test]
    async fn test_older_results_are_marked_superseded() {
        let mut pipeline = SubmissionPipeline::new(Arc::new(Echo));
        let first = pipeline.submit("a".to_string(), 1).unwrap();
        let second = pipeline.submit("b".to_string(), 2).unwrap();

        let mut reports = vec![pipeline.next().await.unwrap(), pipeline.next().await.unwrap()];
        reports.sort_by_key(|r| r.id);
        assert_eq!(reports[0].id, first);
        assert!(reports[0].superseded);
        assert_eq!(reports[1].id, second);
        assert!(!reports[1].superseded);
    }

    #[tokio::test]
    async fn test_panicking_compiler_reports_failure() {
        let mut pipeline = SubmissionPipeline::new(Arc::new(Panics));
        pipeline.submit("boom".to_string(), 0).unwrap();

        let report = pipeline.next().await.unwrap();
        assert!(!report.result.success);
        assert!(report.result.diagnostics[0].message.contains("compiler crashed"));
    }
}
