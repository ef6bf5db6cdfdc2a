/*!
 * Budget-aware text segmentation.
 *
 * Splits a document into ordered segments that each fit a token budget,
 * preferring paragraph boundaries, then sentence boundaries, then a fixed
 * character window as the guaranteed-termination fallback. Sentence pieces
 * of an oversized paragraph are greedily re-merged so the call count stays
 * low. Reassembly joins segments with a blank line, which assumes such a
 * separator is acceptable between any two segments; inputs with meaningful
 * inline adjacency across a split point can see their spacing normalized.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::chunking::estimator::TokenEstimator;

/// Window in characters for text with no usable sentence boundary
const FORCE_SPLIT_CHARS: usize = 500;

/// Characters per budget token when carving a piece that alone exceeds the
/// budget; a conservative inverse of the sparse estimator ratio
const OVERSIZE_CHARS_PER_TOKEN: usize = 3;

/// Blank-line paragraph separator (the blank line may hold whitespace)
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Sentence terminators, tried in order; the first pattern that yields more
/// than one piece wins
static SENTENCE_BOUNDARIES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Spaced-script sentence end followed by whitespace
        Regex::new(r"[.!?]+\s+").unwrap(),
        // Ideographic sentence end, trailing whitespace optional
        Regex::new(r"[。！？]+\s*").unwrap(),
        // Either class right before a line break
        Regex::new(r"[.!?。！？]+\n").unwrap(),
    ]
});

/// Split granularities the segmenter may use before the character fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPreference {
    /// Split on blank-line paragraph breaks
    Paragraph,
    /// Split oversized paragraphs on sentence terminators
    Sentence,
}

/// One bounded-size slice of a document, immutable once produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Position of this segment in the document
    pub index: usize,
    /// Segment text, trimmed of surrounding whitespace
    pub text: String,
    /// Estimated token count of `text`
    pub estimated_tokens: usize,
}

impl Segment {
    fn new(index: usize, text: String) -> Self {
        let estimated_tokens = TokenEstimator::estimate(&text);
        Self { index, text, estimated_tokens }
    }
}

/// Budget-aware segmenter
pub struct Segmenter {
    token_budget: usize,
    use_paragraphs: bool,
    use_sentences: bool,
}

impl Segmenter {
    /// Create a segmenter for the given budget and boundary preferences
    pub fn new(token_budget: usize, boundaries: &[BoundaryPreference]) -> Self {
        Self {
            token_budget: token_budget.max(1),
            use_paragraphs: boundaries.contains(&BoundaryPreference::Paragraph),
            use_sentences: boundaries.contains(&BoundaryPreference::Sentence),
        }
    }

    /// Split `text` into ordered segments within the token budget.
    ///
    /// Blank input yields no segments. Non-blank input always yields at
    /// least one segment, even when the text contains no paragraph or
    /// sentence boundary at all.
    pub fn segment(&self, text: &str) -> Vec<Segment> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        if TokenEstimator::estimate(text) <= self.token_budget {
            return vec![Segment::new(0, text.trim().to_string())];
        }

        let candidates = if self.use_paragraphs {
            self.split_paragraphs(text)
        } else {
            vec![text.to_string()]
        };

        let mut pieces: Vec<String> = Vec::new();
        for candidate in candidates {
            if TokenEstimator::estimate(&candidate) <= self.token_budget {
                pieces.push(candidate);
            } else if self.use_sentences {
                let sentences = self.split_sentences(&candidate);
                pieces.extend(self.merge_pieces(sentences));
            } else {
                pieces.extend(force_split(&candidate, self.oversize_window()));
            }
        }

        pieces
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .enumerate()
            .map(|(index, text)| Segment::new(index, text))
            .collect()
    }

    /// Paragraph candidates: blank-line separated, trimmed, non-empty
    fn split_paragraphs(&self, text: &str) -> Vec<String> {
        PARAGRAPH_BREAK
            .split(text)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect()
    }

    /// Sentence pieces with their terminators kept attached.
    ///
    /// Falls back to the fixed character window when no pattern produces a
    /// real split, which is what guarantees termination on punctuation-free
    /// input.
    fn split_sentences(&self, text: &str) -> Vec<String> {
        for pattern in SENTENCE_BOUNDARIES.iter() {
            let mut sentences = Vec::new();
            let mut start = 0;
            for boundary in pattern.find_iter(text) {
                let piece = &text[start..boundary.end()];
                if !piece.trim().is_empty() {
                    sentences.push(piece.trim().to_string());
                }
                start = boundary.end();
            }
            if start < text.len() {
                let rest = &text[start..];
                if !rest.trim().is_empty() {
                    sentences.push(rest.trim().to_string());
                }
            }
            if sentences.len() > 1 {
                return sentences;
            }
        }

        force_split(text, FORCE_SPLIT_CHARS)
    }

    /// Greedy re-merge of pieces up to the budget, in source order.
    ///
    /// A piece that alone exceeds the budget is carved by character window;
    /// all but its last sub-piece become independent segments and
    /// accumulation continues from the last one.
    fn merge_pieces(&self, pieces: Vec<String>) -> Vec<String> {
        if pieces.is_empty() {
            return Vec::new();
        }

        let mut merged = Vec::new();
        let mut current = String::new();

        for piece in pieces {
            let candidate = if current.is_empty() {
                piece.clone()
            } else {
                format!("{}\n{}", current, piece)
            };

            if TokenEstimator::estimate(&candidate) <= self.token_budget {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                merged.push(std::mem::take(&mut current));
            }

            if TokenEstimator::estimate(&piece) > self.token_budget {
                let mut subs = force_split(&piece, self.oversize_window());
                current = subs.pop().unwrap_or_default();
                merged.extend(subs);
            } else {
                current = piece;
            }
        }

        if !current.is_empty() {
            merged.push(current);
        }

        merged
    }

    fn oversize_window(&self) -> usize {
        (self.token_budget * OVERSIZE_CHARS_PER_TOKEN).max(1)
    }
}

/// Split into fixed-size character windows, never inside a UTF-8 scalar
fn force_split(text: &str, window: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(window.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}
