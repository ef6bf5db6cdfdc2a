/*!
 * Token estimation for chunking decisions.
 *
 * Real tokenizers differ per model, so this only has to be close enough to
 * keep a segment inside a context window. Scripts written without inter-word
 * spacing pack far more meaning per character than spaced scripts, which is
 * why the two classes are counted at different ratios.
 */

/// Approximate characters per token for unspaced scripts (CJK ideographs, kana)
const DENSE_CHARS_PER_TOKEN: f64 = 1.5;

/// Approximate characters per token for everything else
const SPARSE_CHARS_PER_TOKEN: f64 = 4.0;

/// Character-class based token estimator
pub struct TokenEstimator;

impl TokenEstimator {
    /// Estimate how many model-context tokens a text consumes.
    ///
    /// Returns 0 for empty input and at least 1 for any non-empty input.
    /// Each character class is ceiling-rounded separately so a lone
    /// character of either class still costs a token.
    pub fn estimate(text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        let mut dense = 0usize;
        let mut sparse = 0usize;
        for c in text.chars() {
            if Self::is_dense_script(c) {
                dense += 1;
            } else {
                sparse += 1;
            }
        }

        let estimated = (dense as f64 / DENSE_CHARS_PER_TOKEN).ceil() as usize
            + (sparse as f64 / SPARSE_CHARS_PER_TOKEN).ceil() as usize;

        estimated.max(1)
    }

    /// Characters from scripts written without inter-word spacing
    fn is_dense_script(c: char) -> bool {
        matches!(c,
            '\u{4E00}'..='\u{9FFF}'     // CJK Unified Ideographs
            | '\u{3040}'..='\u{309F}'   // Hiragana
            | '\u{30A0}'..='\u{30FF}'   // Katakana
        )
    }
}
