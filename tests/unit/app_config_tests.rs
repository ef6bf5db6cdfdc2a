/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use doctrans::app_config::{Config, LogLevel, TranslationProvider};
use doctrans::chunking::BoundaryPreference;
use crate::common;

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "zh");
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.log_level, LogLevel::Info);

    assert_eq!(config.chunking.token_budget, 4000);
    assert_eq!(
        config.chunking.boundaries,
        vec![BoundaryPreference::Paragraph, BoundaryPreference::Sentence]
    );

    assert_eq!(config.translation.get_model(), "llama2");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.translation.common.template, "standard");
    assert_eq!(config.translation.common.retry_count, 3);
    assert_eq!(config.translation.common.retry_backoff_ms, 1000);
    assert_eq!(config.translation.common.rate_limit_delay_ms, 500);
}

/// Test writing a configuration file and reading it back
#[test]
fn test_configPersistence_withSaveAndLoad_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.source_language = "de".to_string();
    config.target_language = "en".to_string();
    config.chunking.token_budget = 1234;
    config.save_to_file(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.source_language, "de");
    assert_eq!(loaded.target_language, "en");
    assert_eq!(loaded.chunking.token_budget, 1234);
    assert_eq!(loaded.translation.provider, TranslationProvider::Ollama);

    Ok(())
}

/// Test parsing a minimal configuration file with defaulted sections
#[test]
fn test_fromFile_withMinimalJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "conf.json",
        r#"{"source_language": "fr", "target_language": "ja"}"#,
    )?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.source_language, "fr");
    assert_eq!(loaded.target_language, "ja");
    assert_eq!(loaded.chunking.token_budget, 4000);
    assert_eq!(loaded.translation.provider, TranslationProvider::Ollama);
    assert_eq!(loaded.translation.common.temperature, 0.1);
    assert!(loaded.validate().is_ok());

    Ok(())
}

/// Test configuration validation across the failure cases
#[test]
fn test_configValidation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Blank target language
    config.target_language = "  ".to_string();
    assert!(config.validate().is_err());
    config.target_language = "zh".to_string();

    // Zero token budget
    config.chunking.token_budget = 0;
    assert!(config.validate().is_err());
    config.chunking.token_budget = 4000;

    // OpenAI requires an API key
    config.translation.provider = TranslationProvider::OpenAI;
    assert!(config.validate().is_err());
    if let Some(provider) = config
        .translation
        .available_providers
        .iter_mut()
        .find(|p| p.provider_type == "openai")
    {
        provider.api_key = "sk-test-123".to_string();
    }
    assert!(config.validate().is_ok());

    // Unknown template name, unless a custom prompt overrides it
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.common.template = "poetic".to_string();
    assert!(config.validate().is_err());
    config.translation.common.custom_prompt = Some("Translate {text}".to_string());
    assert!(config.validate().is_ok());
}

/// Test provider parsing from string tags
#[test]
fn test_providerFromStr_withKnownAndUnknownTags_shouldParseAccordingly() {
    assert_eq!(
        "ollama".parse::<TranslationProvider>().unwrap(),
        TranslationProvider::Ollama
    );
    assert_eq!(
        "OpenAI".parse::<TranslationProvider>().unwrap(),
        TranslationProvider::OpenAI
    );
    assert!("anthropic".parse::<TranslationProvider>().is_err());

    assert_eq!(TranslationProvider::Ollama.to_string(), "ollama");
    assert_eq!(TranslationProvider::OpenAI.display_name(), "OpenAI");
}

/// Test provider setting getters falling back when the entry is missing
#[test]
fn test_providerGetters_withEmptyProviderList_shouldFallBackToDefaults() {
    let mut config = Config::default();
    config.translation.available_providers.clear();

    assert_eq!(config.translation.get_model(), "llama2");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.translation.get_timeout_secs(), 120);

    config.translation.provider = TranslationProvider::OpenAI;
    assert_eq!(config.translation.get_model(), "gpt-3.5-turbo");
    assert_eq!(config.translation.get_endpoint(), "https://api.openai.com/v1");
    assert_eq!(config.translation.get_timeout_secs(), 60);
}
