/*!
 * Batch translation.
 *
 * Runs a list of document jobs strictly in order against one orchestrator.
 * A failed document never stops the batch; cancellation marks every
 * document that has not started as cancelled without calling the backend
 * for it.
 */

use log::{debug, info};

use crate::translation::cancel::CancellationToken;
use crate::translation::orchestrator::{
    DocumentJob, DocumentOutcome, DocumentStatus, Orchestrator, ProgressEvent, ProgressSink,
};

/// Outcome of one document within a batch run
#[derive(Debug)]
pub struct DocumentReport {
    pub id: String,
    pub outcome: DocumentOutcome,
}

/// Aggregated outcomes of a batch run, in submission order
#[derive(Debug, Default)]
pub struct BatchOutcome {
    reports: Vec<DocumentReport>,
}

impl BatchOutcome {
    fn push(&mut self, id: String, outcome: DocumentOutcome) {
        self.reports.push(DocumentReport { id, outcome });
    }

    /// Per-document reports in submission order
    pub fn reports(&self) -> &[DocumentReport] {
        &self.reports
    }

    /// Outcome of the document with the given identifier
    pub fn get(&self, id: &str) -> Option<&DocumentOutcome> {
        self.reports
            .iter()
            .find(|report| report.id == id)
            .map(|report| &report.outcome)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Number of documents that produced a full translation
    pub fn completed_count(&self) -> usize {
        self.count_status(DocumentStatus::Completed)
    }

    /// Number of documents that failed
    pub fn failed_count(&self) -> usize {
        self.count_status(DocumentStatus::Failed)
    }

    /// Number of documents cancelled before completion
    pub fn cancelled_count(&self) -> usize {
        self.count_status(DocumentStatus::Cancelled)
    }

    fn count_status(&self, status: DocumentStatus) -> usize {
        self.reports
            .iter()
            .filter(|report| report.outcome.status() == status)
            .count()
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} completed, {} failed, {} cancelled",
            self.completed_count(),
            self.failed_count(),
            self.cancelled_count()
        )
    }
}

/// Runs document jobs sequentially against one orchestrator
pub struct BatchRunner {
    orchestrator: Orchestrator,
}

impl BatchRunner {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    /// The orchestrator this runner delegates to
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Run every job in order and collect the outcomes.
    ///
    /// The token is checked before each document; once cancelled, every
    /// remaining document is reported as cancelled without a backend call.
    /// `on_progress` fires once per document, after it reaches a terminal
    /// state, with the number of documents finished so far.
    pub async fn run<F>(
        &self,
        jobs: &[DocumentJob],
        cancel: &CancellationToken,
        sink: &dyn ProgressSink,
        mut on_progress: F,
    ) -> BatchOutcome
    where
        F: FnMut(usize, usize, &str, &DocumentOutcome),
    {
        let total = jobs.len();
        let mut outcome = BatchOutcome::default();
        info!("Starting batch of {} documents", total);

        for (index, job) in jobs.iter().enumerate() {
            let doc_outcome = if cancel.is_cancelled() {
                debug!("Batch cancelled, not starting {}", job.id);
                sink.on_event(
                    &job.id,
                    &ProgressEvent::StatusChanged {
                        status: DocumentStatus::Cancelled,
                    },
                );
                DocumentOutcome::Cancelled
            } else {
                self.orchestrator.translate_document(job, cancel, sink).await
            };

            on_progress(index + 1, total, &job.id, &doc_outcome);
            outcome.push(job.id.clone(), doc_outcome);
        }

        info!("Batch finished: {}", outcome.summary());
        outcome
    }
}
