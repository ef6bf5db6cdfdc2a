/*!
 * Ollama API client.
 *
 * Talks to a local or remote Ollama instance over its HTTP API. The
 * configured model is resolved against `/api/tags` before the first
 * generation: a missing model is substituted with the first installed one,
 * and an empty registry fails the call before any generation request is
 * sent. The resolution result is cached for the lifetime of the client.
 */

use async_trait::async_trait;
use log::{debug, warn};
use parking_lot::Mutex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::{ConfigError, ProviderError};
use crate::providers::{map_status_error, map_transport_error, Backend};

/// Request body for `/api/generate`
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    /// Model identifier, for example `llama2` or `llama2:13b`
    pub model: String,
    /// Prompt text
    pub prompt: String,
    /// Optional system message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Disable streaming so the response arrives as one JSON object
    pub stream: bool,
    /// Sampling options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerationOptions>,
}

/// Sampling options for a generation request
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationOptions {
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    /// Create a non-streaming request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            stream: false,
            options: None,
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        let options = self.options.get_or_insert_with(GenerationOptions::default);
        options.temperature = Some(temperature);
        self
    }
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Client for the Ollama HTTP API
#[derive(Debug)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    temperature: f32,
    client: Client,
    /// Model name confirmed against the instance, filled on first use
    resolved_model: Mutex<Option<String>>,
}

impl OllamaClient {
    /// Create a new client for the given instance URL.
    /// Fails when the endpoint is not a valid absolute URL.
    pub fn new(
        endpoint: &str,
        model: String,
        temperature: f32,
        timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        let parsed = Url::parse(endpoint).map_err(|e| {
            ConfigError::InvalidValue(format!("invalid Ollama endpoint {endpoint:?}: {e}"))
        })?;

        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            model,
            temperature,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .pool_max_idle_per_host(20)
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            resolved_model: Mutex::new(None),
        })
    }

    /// Configured model identifier, before resolution
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Instance version string, used as the reachability probe
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::ParseError(format!("failed to read response body: {e}")))?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::ParseError(format!("invalid JSON response: {e}")))?;
        match value["version"].as_str() {
            Some(version) => Ok(version.to_string()),
            None => Err(ProviderError::ParseError(
                "version response missing version field".to_string(),
            )),
        }
    }

    /// Names of the models installed on the instance
    pub async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::ParseError(format!("failed to read response body: {e}")))?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }

        let tags: TagsResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::ParseError(format!("invalid tags response: {e}")))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Resolve the configured model against the instance.
    ///
    /// The configured name matches either exactly or as the untagged form of
    /// an installed `name:tag`. When it matches nothing, the first installed
    /// model is substituted and the substitution is logged. An empty registry
    /// is an error; no generation request is sent in that case.
    async fn resolve_model(&self) -> Result<String, ProviderError> {
        if let Some(name) = self.resolved_model.lock().clone() {
            return Ok(name);
        }

        let available = self.list_models().await?;
        let tagged_prefix = format!("{}:", self.model);
        let resolved = if available
            .iter()
            .any(|name| name == &self.model || name.starts_with(&tagged_prefix))
        {
            self.model.clone()
        } else if let Some(first) = available.first() {
            warn!(
                "Model {} is not installed on {}, using {} instead",
                self.model, self.base_url, first
            );
            first.clone()
        } else {
            return Err(ProviderError::NoModelAvailable(self.base_url.clone()));
        };

        *self.resolved_model.lock() = Some(resolved.clone());
        Ok(resolved)
    }

    async fn send_generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        debug!("Sending generation request to {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::ParseError(format!("failed to read response body: {e}")))?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }

        extract_response(&body)
    }
}

/// Pull the generated text out of a generation response body.
///
/// Accepts both the single-object non-streaming shape and a line-delimited
/// stream that some proxies forward regardless of the `stream` flag.
fn extract_response(body: &str) -> Result<String, ProviderError> {
    if let Ok(parsed) = serde_json::from_str::<GenerationResponse>(body) {
        let text = parsed.response.trim();
        if !text.is_empty() {
            return Ok(text.to_string());
        }
    }

    let mut accumulated = String::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(line) {
            if let Some(fragment) = value["response"].as_str() {
                accumulated.push_str(fragment);
            }
        }
    }

    let accumulated = accumulated.trim();
    if accumulated.is_empty() {
        Err(ProviderError::ParseError(
            "response contained no generated text".to_string(),
        ))
    } else {
        Ok(accumulated.to_string())
    }
}

#[async_trait]
impl Backend for OllamaClient {
    async fn request_translation(&self, prompt: &str) -> Result<String, ProviderError> {
        let model = self.resolve_model().await?;
        let request = GenerationRequest::new(model, prompt).with_temperature(self.temperature);
        self.send_generate(&request).await
    }

    async fn check_reachable(&self) -> bool {
        self.version().await.is_ok()
    }

    fn describe(&self) -> String {
        format!("ollama ({})", self.model)
    }
}
