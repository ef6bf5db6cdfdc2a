/*!
 * Tests for language tag resolution
 */

use doctrans::language_utils::{display_name, is_recognized, parse_language};

/// Test recognition across ISO 639-1, 639-3 and bibliographic codes
#[test]
fn test_parseLanguage_withIsoCodes_shouldRecognizeAllFormats() {
    // ISO 639-1, case and whitespace insensitive
    assert!(parse_language("en").is_some());
    assert!(parse_language("EN").is_some());
    assert!(parse_language(" fr ").is_some());

    // ISO 639-3 terminological codes
    assert!(parse_language("eng").is_some());
    assert!(parse_language("deu").is_some());

    // Bibliographic variants map to their terminological form
    assert_eq!(parse_language("fre"), parse_language("fra"));
    assert_eq!(parse_language("ger"), parse_language("deu"));
    assert_eq!(parse_language("chi"), parse_language("zho"));

    // Unknown codes
    assert!(parse_language("xq").is_none());
    assert!(parse_language("").is_none());
}

/// Test recognition of full names and autonyms
#[test]
fn test_parseLanguage_withNamesAndAutonyms_shouldResolveThem() {
    assert!(parse_language("English").is_some());
    assert!(parse_language("French").is_some());
    assert!(parse_language("Deutsch").is_some());
    assert!(parse_language("中文").is_some());

    assert!(is_recognized("Japanese"));
    assert!(!is_recognized("Galactic Standard"));
}

/// Test display names used when filling prompts
#[test]
fn test_displayName_withCodesAndUnknownTags_shouldResolveOrPassThrough() {
    assert_eq!(display_name("en"), "English");
    assert_eq!(display_name("fre"), "French");
    assert_eq!(display_name("zh"), "Chinese");

    // Unrecognized tags pass through trimmed so they still reach the model
    assert_eq!(display_name(" x-private-dialect "), "x-private-dialect");
}
