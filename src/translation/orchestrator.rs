/*!
 * Document translation orchestration.
 *
 * Drives one document through its lifecycle: segmentation, one backend call
 * per segment in order, and deterministic reassembly. Progress is reported
 * through a sink supplied by the caller; cancellation is polled before each
 * segment and while a call or pacing delay is pending. A document either
 * completes fully or yields no output at all.
 */

use log::{debug, error, info};
use std::time::Duration;

use crate::app_config::Config;
use crate::chunking::Segmenter;
use crate::errors::{AppError, ConfigError, ProviderError};
use crate::language_utils;
use crate::providers::BackendClient;
use crate::translation::cancel::CancellationToken;
use crate::translation::prompts::PromptTemplate;

/// Lifecycle stage of a document job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    /// Accepted, nothing started
    Pending,
    /// Splitting the document into segments
    Segmenting,
    /// Translating segments in order
    Translating,
    /// Reassembling translated segments
    Merging,
    /// Finished with a full translation
    Completed,
    /// Finished with an error and no output
    Failed,
    /// Stopped on request with no output
    Cancelled,
}

/// One document to translate
#[derive(Debug, Clone)]
pub struct DocumentJob {
    /// Caller-chosen identifier, shown in progress events and logs
    pub id: String,
    /// Full document text
    pub text: String,
}

impl DocumentJob {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Why a document failed
#[derive(Debug)]
pub enum FailureReason {
    /// The document contained no translatable text
    EmptyInput,
    /// A segment call failed after exhausting its retries
    SegmentFailed {
        /// Zero-based index of the failed segment
        index: usize,
        /// Total number of segments in the document
        total: usize,
        source: ProviderError,
    },
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "document contains no translatable text"),
            Self::SegmentFailed {
                index,
                total,
                source,
            } => write!(f, "segment {}/{} failed: {}", index + 1, total, source),
        }
    }
}

/// Terminal result of one document job
#[derive(Debug)]
pub enum DocumentOutcome {
    /// Full translation produced
    Completed { translated: String },
    /// No output; the reason names the failing segment where one exists
    Failed(FailureReason),
    /// Stopped on request, no output
    Cancelled,
}

impl DocumentOutcome {
    /// Terminal status matching this outcome
    pub fn status(&self) -> DocumentStatus {
        match self {
            Self::Completed { .. } => DocumentStatus::Completed,
            Self::Failed(_) => DocumentStatus::Failed,
            Self::Cancelled => DocumentStatus::Cancelled,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Translated text when the document completed
    pub fn translated_text(&self) -> Option<&str> {
        match self {
            Self::Completed { translated } => Some(translated),
            _ => None,
        }
    }
}

/// Progress notification emitted while a document is processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The job moved to a new lifecycle stage
    StatusChanged { status: DocumentStatus },
    /// Segmentation finished with the given segment count
    Segmented { segments: usize },
    /// One more segment finished translating
    SegmentCompleted { completed: usize, total: usize },
}

/// Receiver for progress events, supplied by the caller
pub trait ProgressSink: Send + Sync {
    fn on_event(&self, job_id: &str, event: &ProgressEvent);
}

/// Sink that discards every event
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_event(&self, _job_id: &str, _event: &ProgressEvent) {}
}

impl<F> ProgressSink for F
where
    F: Fn(&str, &ProgressEvent) + Send + Sync,
{
    fn on_event(&self, job_id: &str, event: &ProgressEvent) {
        self(job_id, event)
    }
}

/// Join translated pieces in document order.
///
/// Pieces are trimmed and empty ones dropped; consecutive pieces are
/// separated by a blank line unless the accumulated text already ends
/// with one.
pub fn merge_translations<I>(pieces: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut merged = String::new();
    for piece in pieces {
        let piece = piece.as_ref().trim();
        if piece.is_empty() {
            continue;
        }
        if !merged.is_empty() && !merged.ends_with("\n\n") {
            merged.push_str("\n\n");
        }
        merged.push_str(piece);
    }
    merged
}

/// Translates documents one segment at a time against a single backend
pub struct Orchestrator {
    backend: BackendClient,
    segmenter: Segmenter,
    template: PromptTemplate,
    source_language: String,
    target_language: String,
    /// Delay inserted between consecutive segment calls
    pacing: Duration,
}

impl Orchestrator {
    /// Create an orchestrator with explicit collaborators.
    /// Language tags are resolved to display names here, once.
    pub fn new(
        backend: BackendClient,
        segmenter: Segmenter,
        template: PromptTemplate,
        source_language: &str,
        target_language: &str,
    ) -> Self {
        Self {
            backend,
            segmenter,
            template,
            source_language: language_utils::display_name(source_language),
            target_language: language_utils::display_name(target_language),
            pacing: Duration::ZERO,
        }
    }

    /// Create an orchestrator from an application configuration
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let backend = BackendClient::from_config(&config.translation)?;
        let segmenter = Segmenter::new(config.chunking.token_budget, &config.chunking.boundaries);
        let common = &config.translation.common;

        let template = match &common.custom_prompt {
            Some(custom) => PromptTemplate::new(custom),
            None => PromptTemplate::by_name(&common.template).ok_or_else(|| {
                ConfigError::InvalidValue(format!("unknown prompt template {:?}", common.template))
            })?,
        };

        Ok(Self {
            backend,
            segmenter,
            template,
            source_language: language_utils::display_name(&config.source_language),
            target_language: language_utils::display_name(&config.target_language),
            pacing: Duration::from_millis(common.rate_limit_delay_ms),
        })
    }

    /// Replace the pacing delay between segment calls
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// The backend this orchestrator translates against
    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    /// Translate one document to completion, failure or cancellation.
    ///
    /// Segments are translated strictly in order with at most one call in
    /// flight. Any segment failure fails the whole document; a cancelled
    /// document yields no partial output.
    pub async fn translate_document(
        &self,
        job: &DocumentJob,
        cancel: &CancellationToken,
        sink: &dyn ProgressSink,
    ) -> DocumentOutcome {
        self.emit_status(job, sink, DocumentStatus::Pending);

        if cancel.is_cancelled() {
            return self.finish_cancelled(job, sink);
        }

        self.emit_status(job, sink, DocumentStatus::Segmenting);
        let segments = self.segmenter.segment(&job.text);
        if segments.is_empty() {
            info!("Document {} contains no translatable text", job.id);
            self.emit_status(job, sink, DocumentStatus::Failed);
            return DocumentOutcome::Failed(FailureReason::EmptyInput);
        }

        let total = segments.len();
        sink.on_event(&job.id, &ProgressEvent::Segmented { segments: total });
        info!("Translating {} in {} segments", job.id, total);

        self.emit_status(job, sink, DocumentStatus::Translating);
        let mut pieces: Vec<String> = Vec::with_capacity(total);

        for (index, segment) in segments.iter().enumerate() {
            if cancel.is_cancelled() {
                return self.finish_cancelled(job, sink);
            }

            debug!(
                "Translating segment {}/{} of {} ({} tokens)",
                index + 1,
                total,
                job.id,
                segment.estimated_tokens
            );
            let prompt =
                self.template
                    .render(&self.source_language, &self.target_language, &segment.text);

            match self.backend.translate_segment(&prompt, cancel).await {
                Ok(translated) => {
                    pieces.push(translated);
                    sink.on_event(
                        &job.id,
                        &ProgressEvent::SegmentCompleted {
                            completed: index + 1,
                            total,
                        },
                    );
                }
                Err(ProviderError::Cancelled) => {
                    return self.finish_cancelled(job, sink);
                }
                Err(err) => {
                    error!(
                        "Segment {}/{} of {} failed: {}",
                        index + 1,
                        total,
                        job.id,
                        err
                    );
                    self.emit_status(job, sink, DocumentStatus::Failed);
                    return DocumentOutcome::Failed(FailureReason::SegmentFailed {
                        index,
                        total,
                        source: err,
                    });
                }
            }

            // Pacing between calls doubles as a cancellation poll point
            if index + 1 < total && !self.pacing.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return self.finish_cancelled(job, sink),
                    _ = tokio::time::sleep(self.pacing) => {}
                }
            }
        }

        self.emit_status(job, sink, DocumentStatus::Merging);
        let translated = merge_translations(&pieces);
        self.emit_status(job, sink, DocumentStatus::Completed);
        info!("Completed {} ({} segments)", job.id, total);

        DocumentOutcome::Completed { translated }
    }

    fn emit_status(&self, job: &DocumentJob, sink: &dyn ProgressSink, status: DocumentStatus) {
        sink.on_event(&job.id, &ProgressEvent::StatusChanged { status });
    }

    fn finish_cancelled(&self, job: &DocumentJob, sink: &dyn ProgressSink) -> DocumentOutcome {
        info!("Translation of {} cancelled", job.id);
        self.emit_status(job, sink, DocumentStatus::Cancelled);
        DocumentOutcome::Cancelled
    }
}
