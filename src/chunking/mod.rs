/*!
 * Text chunking for bounded-size model calls.
 *
 * This module turns arbitrary documents into ordered segments that each fit
 * a model token budget:
 * - `estimator`: character-class token estimation
 * - `segmenter`: boundary-aware splitting and greedy re-merging
 */

pub mod estimator;
pub mod segmenter;

pub use estimator::TokenEstimator;
pub use segmenter::{BoundaryPreference, Segment, Segmenter};
