/*!
 * Translation pipeline.
 *
 * `orchestrator` drives one document through segmentation, per-segment
 * backend calls and reassembly; `batch` runs a sequence of documents and
 * aggregates their outcomes; `prompts` fills the prompt templates; `cancel`
 * carries the cooperative stop signal through all of it.
 */

pub mod batch;
pub mod cancel;
pub mod orchestrator;
pub mod prompts;

pub use batch::{BatchOutcome, BatchRunner, DocumentReport};
pub use cancel::CancellationToken;
pub use orchestrator::{
    merge_translations, DocumentJob, DocumentOutcome, DocumentStatus, FailureReason, NullSink,
    Orchestrator, ProgressEvent, ProgressSink,
};
pub use prompts::PromptTemplate;
