use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::chunking::BoundaryPreference;
use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language tag (ISO code or plain name)
    pub source_language: String,

    /// Target language tag (ISO code or plain name)
    pub target_language: String,

    /// Chunking config
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Ollama (self-hosted model registry)
    #[default]
    Ollama,
    // @provider: OpenAI-compatible chat completions API
    OpenAI,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
            Self::OpenAI => "OpenAI",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Ollama => "ollama".to_string(),
            Self::OpenAI => "openai".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Per-attempt timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_ollama_timeout_secs(),
            },
            TranslationProvider::OpenAI => Self {
                provider_type: "openai".to_string(),
                model: default_openai_model(),
                api_key: String::new(),
                endpoint: default_openai_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// Chunking configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Maximum estimated tokens per segment
    #[serde(default = "default_token_budget")]
    pub token_budget: usize,

    /// Preferred split granularities before the character fallback
    #[serde(default = "default_boundaries")]
    pub boundaries: Vec<BoundaryPreference>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            token_budget: default_token_budget(),
            boundaries: default_boundaries(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Name of the built-in prompt template (standard, technical, literary)
    #[serde(default = "default_template_name")]
    pub template: String,

    /// Custom prompt template; overrides `template` when set.
    /// Placeholders: {source_lang}, {target_lang}, {text}
    #[serde(default)]
    pub custom_prompt: Option<String>,

    /// Pacing delay in milliseconds between consecutive segment requests
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for rate-limited retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            template: default_template_name(),
            custom_prompt: None,
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_token_budget() -> usize {
    4000
}

fn default_boundaries() -> Vec<BoundaryPreference> {
    vec![BoundaryPreference::Paragraph, BoundaryPreference::Sentence]
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_ollama_timeout_secs() -> u64 {
    120
}

fn default_rate_limit_delay_ms() -> u64 {
    500 // 500ms default delay between segment requests
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.1
}

fn default_template_name() -> String {
    "standard".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ollama_model() -> String {
    "llama2".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        Ok(config)
    }

    /// Write the configuration out as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(anyhow!("Source language must not be empty"));
        }
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language must not be empty"));
        }

        if self.chunking.token_budget == 0 {
            return Err(anyhow!("Token budget must be at least 1"));
        }

        // Validate API key for providers that require one
        if self.translation.provider == TranslationProvider::OpenAI {
            let api_key = self.translation.get_api_key();
            if api_key.is_empty() {
                return Err(anyhow!("Translation API key is required for OpenAI provider"));
            }
        }

        // The named template must exist unless a custom prompt overrides it
        if self.translation.common.custom_prompt.is_none()
            && crate::translation::PromptTemplate::by_name(&self.translation.common.template).is_none()
        {
            return Err(anyhow!(
                "Unknown prompt template: {} (expected standard, technical or literary)",
                self.translation.common.template
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_language: "zh".to_string(),
            chunking: ChunkingConfig::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Ollama => default_ollama_model(),
            TranslationProvider::OpenAI => default_openai_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        // Default fallback - Ollama doesn't use API keys
        String::new()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Ollama => default_ollama_endpoint(),
            TranslationProvider::OpenAI => default_openai_endpoint(),
        }
    }

    /// Get the per-attempt timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.timeout_secs > 0 {
                return provider_config.timeout_secs;
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Ollama => default_ollama_timeout_secs(),
            TranslationProvider::OpenAI => default_timeout_secs(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        let mut config = Self {
            provider: TranslationProvider::default(),
            available_providers: Vec::new(),
            common: TranslationCommonConfig::default(),
        };

        // Add default providers
        config.available_providers.push(ProviderConfig::new(TranslationProvider::Ollama));
        config.available_providers.push(ProviderConfig::new(TranslationProvider::OpenAI));

        config
    }
}
