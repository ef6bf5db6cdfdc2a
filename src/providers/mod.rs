/*!
 * Translation backend clients.
 *
 * Each remote provider implements the `Backend` trait with a single-attempt
 * request; `BackendClient` wraps the selected variant and applies the shared
 * retry, backoff and cancellation policy around every call. Adding a provider
 * means adding a variant and its `Backend` impl; the orchestration layer only
 * ever sees `BackendClient`.
 */

use async_trait::async_trait;
use log::{error, warn};
use reqwest::StatusCode;
use std::fmt::Debug;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::{ConfigError, ProviderError};
use crate::translation::CancellationToken;

pub mod mock;
pub mod ollama;
pub mod openai;

pub use mock::{MockBackend, MockBehavior};
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

/// Default delay before retrying a generic transient failure
const DEFAULT_TRANSIENT_DELAY_MS: u64 = 1000;

/// Capability surface shared by every backend.
///
/// Implementations perform exactly one request per call; retries live in
/// [`BackendClient`] so every variant gets the same policy.
#[async_trait]
pub trait Backend: Send + Sync + Debug {
    /// Send one translation request and return the raw model output.
    async fn request_translation(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Cheap reachability probe. Never consumes the retry budget.
    async fn check_reachable(&self) -> bool;

    /// Short identification string for log lines.
    fn describe(&self) -> String;
}

/// Retry policy applied to one segment translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt
    pub max_retries: u32,
    /// Base delay for exponential rate-limit backoff
    pub backoff_base_ms: u64,
    /// Fixed delay before retrying other transient failures
    pub transient_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base_ms: 1000,
            transient_delay_ms: DEFAULT_TRANSIENT_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after a failure on the given attempt (1-based).
    /// Rate limits back off exponentially; other transient failures wait a
    /// fixed interval.
    pub fn delay_after(&self, error: &ProviderError, attempt: u32) -> Duration {
        if error.is_rate_limit() {
            let factor = 1u64 << (attempt.saturating_sub(1)).min(20);
            Duration::from_millis(self.backoff_base_ms.saturating_mul(factor))
        } else {
            Duration::from_millis(self.transient_delay_ms)
        }
    }
}

/// The configured backend variant
#[derive(Debug)]
pub enum BackendVariant {
    /// OpenAI-compatible chat completions API
    OpenAi(OpenAiClient),
    /// Self-hosted Ollama instance
    Ollama(OllamaClient),
    /// Scripted in-process backend for tests
    Mock(MockBackend),
}

/// Client handle used by the orchestration layer.
///
/// Owns the selected [`BackendVariant`] together with the retry policy and
/// exposes the provider-independent call surface.
#[derive(Debug)]
pub struct BackendClient {
    variant: BackendVariant,
    retry: RetryPolicy,
}

impl BackendClient {
    /// Build the client selected by the configuration.
    ///
    /// The provider tag itself is validated when the configuration is parsed;
    /// this rejects configurations whose selected provider is missing a
    /// required credential or carries an unusable endpoint.
    pub fn from_config(config: &TranslationConfig) -> Result<Self, ConfigError> {
        let retry = RetryPolicy {
            max_retries: config.common.retry_count,
            backoff_base_ms: config.common.retry_backoff_ms,
            ..RetryPolicy::default()
        };

        let variant = match config.provider {
            TranslationProvider::OpenAI => {
                let api_key = config.get_api_key();
                if api_key.is_empty() {
                    return Err(ConfigError::MissingCredential(
                        TranslationProvider::OpenAI.to_lowercase_string(),
                    ));
                }
                BackendVariant::OpenAi(OpenAiClient::new(
                    &config.get_endpoint(),
                    api_key,
                    config.get_model(),
                    config.common.temperature,
                    config.get_timeout_secs(),
                )?)
            }
            TranslationProvider::Ollama => BackendVariant::Ollama(OllamaClient::new(
                &config.get_endpoint(),
                config.get_model(),
                config.common.temperature,
                config.get_timeout_secs(),
            )?),
        };

        Ok(Self { variant, retry })
    }

    /// Wrap a scripted backend for tests
    pub fn mock(backend: MockBackend) -> Self {
        Self {
            variant: BackendVariant::Mock(backend),
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The active retry policy
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    fn as_backend(&self) -> &dyn Backend {
        match &self.variant {
            BackendVariant::OpenAi(client) => client,
            BackendVariant::Ollama(client) => client,
            BackendVariant::Mock(client) => client,
        }
    }

    /// Translate one segment, retrying transient failures.
    ///
    /// The token is polled before every attempt and while a request or a
    /// retry delay is pending; cancellation drops the in-flight request
    /// future, which aborts the underlying connection.
    pub async fn translate_segment(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError> {
        let backend = self.as_backend();
        let mut attempt: u32 = 1;

        loop {
            if cancel.is_cancelled() {
                return Err(ProviderError::Cancelled);
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(ProviderError::Cancelled),
                result = backend.request_translation(prompt) => result,
            };

            match result {
                Ok(text) => return Ok(text),
                Err(ProviderError::Cancelled) => return Err(ProviderError::Cancelled),
                Err(err) if err.is_retryable() && attempt <= self.retry.max_retries => {
                    let delay = self.retry.delay_after(&err, attempt);
                    warn!(
                        "{} attempt {}/{} failed, retrying in {}ms: {}",
                        backend.describe(),
                        attempt,
                        self.retry.max_retries + 1,
                        delay.as_millis(),
                        err
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
                Err(err) => {
                    error!("{} request failed: {}", backend.describe(), err);
                    return Err(err);
                }
            }
        }
    }

    /// Probe the backend without consuming the retry budget
    pub async fn check_reachable(&self) -> bool {
        self.as_backend().check_reachable().await
    }

    /// Identification string for log lines and status output
    pub fn describe(&self) -> String {
        self.as_backend().describe()
    }
}

/// Map a transport-level reqwest failure onto the provider error taxonomy
pub(crate) fn map_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string())
    } else if err.is_connect() {
        ProviderError::ConnectionError(err.to_string())
    } else {
        ProviderError::RequestFailed(err.to_string())
    }
}

/// Map a non-success HTTP status onto the provider error taxonomy
pub(crate) fn map_status_error(status: StatusCode, body: &str) -> ProviderError {
    let message = if body.trim().is_empty() {
        status.to_string()
    } else {
        body.trim().to_string()
    };
    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationError(message),
        429 => ProviderError::RateLimitExceeded(message),
        code => ProviderError::ApiError {
            status_code: code,
            message,
        },
    }
}
