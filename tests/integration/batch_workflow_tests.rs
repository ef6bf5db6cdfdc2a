/*!
 * Batch workflow tests covering mixed outcomes and mid-batch cancellation
 */

use std::sync::Mutex;

use doctrans::chunking::{BoundaryPreference, Segmenter};
use doctrans::providers::{BackendClient, MockBackend, RetryPolicy};
use doctrans::translation::{
    BatchRunner, CancellationToken, DocumentJob, DocumentOutcome, DocumentStatus, FailureReason,
    NullSink, Orchestrator, ProgressEvent, ProgressSink, PromptTemplate,
};

/// Batch runner over a scripted backend with millisecond retry delays
fn runner_with(backend: MockBackend) -> BatchRunner {
    let client = BackendClient::mock(backend).with_retry(RetryPolicy {
        max_retries: 0,
        backoff_base_ms: 1,
        transient_delay_ms: 1,
    });
    BatchRunner::new(Orchestrator::new(
        client,
        Segmenter::new(
            4000,
            &[BoundaryPreference::Paragraph, BoundaryPreference::Sentence],
        ),
        PromptTemplate::default(),
        "en",
        "es",
    ))
}

/// Sink that records which documents were marked cancelled
#[derive(Default)]
struct CancelEventSink {
    cancelled: Mutex<Vec<String>>,
}

impl CancelEventSink {
    fn cancelled_ids(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }
}

impl ProgressSink for CancelEventSink {
    fn on_event(&self, job_id: &str, event: &ProgressEvent) {
        if matches!(
            event,
            ProgressEvent::StatusChanged {
                status: DocumentStatus::Cancelled
            }
        ) {
            self.cancelled.lock().unwrap().push(job_id.to_string());
        }
    }
}

/// Test that a clean batch reports every document in submission order
#[tokio::test]
async fn test_batchRun_withThreeChapters_shouldCompleteAllInOrder() {
    let runner = runner_with(MockBackend::working());
    let jobs = vec![
        DocumentJob::new("chapters/01.md", "Chapter one text."),
        DocumentJob::new("chapters/02.md", "Chapter two text."),
        DocumentJob::new("chapters/03.md", "Chapter three text."),
    ];

    let outcome = runner
        .run(&jobs, &CancellationToken::new(), &NullSink, |_, _, _, _| {})
        .await;

    assert_eq!(outcome.len(), 3);
    assert_eq!(outcome.completed_count(), 3);
    assert_eq!(outcome.summary(), "3 completed, 0 failed, 0 cancelled");

    let ids: Vec<&str> = outcome
        .reports()
        .iter()
        .map(|report| report.id.as_str())
        .collect();
    assert_eq!(ids, vec!["chapters/01.md", "chapters/02.md", "chapters/03.md"]);
    assert!(outcome
        .reports()
        .iter()
        .all(|report| report.outcome.is_completed()));
}

/// Test that a document with no translatable text fails alone
#[tokio::test]
async fn test_batchRun_withEmptyMiddleDocument_shouldFailOnlyThatDocument() {
    let backend = MockBackend::working();
    let observer = backend.clone();
    let runner = runner_with(backend);
    let jobs = vec![
        DocumentJob::new("good-1.txt", "Some translatable text."),
        DocumentJob::new("blank.txt", "   \n\n   "),
        DocumentJob::new("good-2.txt", "More translatable text."),
    ];

    let outcome = runner
        .run(&jobs, &CancellationToken::new(), &NullSink, |_, _, _, _| {})
        .await;

    assert_eq!(outcome.completed_count(), 2);
    assert_eq!(outcome.failed_count(), 1);
    assert!(matches!(
        outcome.get("blank.txt"),
        Some(DocumentOutcome::Failed(FailureReason::EmptyInput))
    ));
    // The blank document never reached the backend
    assert_eq!(observer.request_count(), 2);
}

/// Test that cancellation mid-batch skips the rest without backend calls
#[tokio::test]
async fn test_batchRun_withCancelAfterSecondDocument_shouldSkipRemaining() {
    let backend = MockBackend::working();
    let observer = backend.clone();
    let runner = runner_with(backend);
    let jobs = vec![
        DocumentJob::new("doc-1.txt", "Text one."),
        DocumentJob::new("doc-2.txt", "Text two."),
        DocumentJob::new("doc-3.txt", "Text three."),
        DocumentJob::new("doc-4.txt", "Text four."),
    ];

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let sink = CancelEventSink::default();

    let outcome = runner
        .run(&jobs, &cancel, &sink, move |completed, _, _, _| {
            if completed == 2 {
                trigger.cancel();
            }
        })
        .await;

    assert_eq!(outcome.completed_count(), 2);
    assert_eq!(outcome.cancelled_count(), 2);
    assert_eq!(outcome.summary(), "2 completed, 0 failed, 2 cancelled");
    // Two single-segment documents were translated before the cancel
    assert_eq!(observer.request_count(), 2);
    assert_eq!(sink.cancelled_ids(), vec!["doc-3.txt", "doc-4.txt"]);
}

/// Test the shape of the per-document progress callback
#[tokio::test]
async fn test_batchRun_progressCallback_shouldCountDocumentsMonotonically() {
    let runner = runner_with(MockBackend::working());
    let jobs = vec![
        DocumentJob::new("a.txt", "Alpha."),
        DocumentJob::new("b.txt", "Beta."),
    ];
    let mut calls: Vec<(usize, usize, String, bool)> = Vec::new();

    runner
        .run(
            &jobs,
            &CancellationToken::new(),
            &NullSink,
            |completed, total, id, outcome| {
                calls.push((completed, total, id.to_string(), outcome.is_completed()));
            },
        )
        .await;

    assert_eq!(
        calls,
        vec![
            (1, 2, "a.txt".to_string(), true),
            (2, 2, "b.txt".to_string(), true),
        ]
    );
}
