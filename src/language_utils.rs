/*!
 * Language tag handling.
 *
 * Configuration accepts ISO 639-1 codes (`en`), ISO 639-2 codes (`eng`,
 * bibliographic forms included) and plain language names (`English`,
 * `中文`). Recognized tags are rendered into prompts as their English
 * names; unrecognized tags are passed through verbatim so that uncatalogued
 * languages still reach the model.
 */

use isolang::Language;
use log::debug;

/// Map an ISO 639-2/B bibliographic code onto its 639-2/T equivalent
fn bibliographic_to_terminological(code: &str) -> Option<&'static str> {
    let mapped = match code {
        "fre" => "fra", // French
        "ger" => "deu", // German
        "dut" => "nld", // Dutch
        "gre" => "ell", // Greek
        "chi" => "zho", // Chinese
        "cze" => "ces", // Czech
        "ice" => "isl", // Icelandic
        "alb" => "sqi", // Albanian
        "arm" => "hye", // Armenian
        "baq" => "eus", // Basque
        "bur" => "mya", // Burmese
        "per" => "fas", // Persian
        "geo" => "kat", // Georgian
        "may" => "msa", // Malay
        "mac" => "mkd", // Macedonian
        "rum" => "ron", // Romanian
        "slo" => "slk", // Slovak
        "wel" => "cym", // Welsh
        _ => return None,
    };
    Some(mapped)
}

/// Parse a language tag in any supported form
pub fn parse_language(tag: &str) -> Option<Language> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lowered = trimmed.to_lowercase();
    match lowered.len() {
        2 => {
            if let Some(lang) = Language::from_639_1(&lowered) {
                return Some(lang);
            }
        }
        3 => {
            let code = bibliographic_to_terminological(&lowered).unwrap_or(&lowered);
            if let Some(lang) = Language::from_639_3(code) {
                return Some(lang);
            }
        }
        _ => {}
    }

    // Full names, English first, then native spellings such as 中文
    Language::from_name(trimmed).or_else(|| Language::from_autonym(trimmed))
}

/// Whether a tag resolves to a catalogued language
pub fn is_recognized(tag: &str) -> bool {
    parse_language(tag).is_some()
}

/// English display name used when filling prompt templates.
/// Unrecognized tags are returned trimmed but otherwise unchanged.
pub fn display_name(tag: &str) -> String {
    match parse_language(tag) {
        Some(lang) => lang.to_name().to_string(),
        None => {
            debug!("Unrecognized language tag {:?}, using it verbatim", tag);
            tag.trim().to_string()
        }
    }
}
