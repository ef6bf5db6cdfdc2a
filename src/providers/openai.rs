/*!
 * OpenAI chat completions client.
 *
 * Talks to the `/chat/completions` endpoint of api.openai.com or any
 * API-compatible server. The configured endpoint is the API base
 * (for example `https://api.openai.com/v1`); request paths are appended.
 */

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::{ConfigError, ProviderError};
use crate::providers::{map_status_error, map_transport_error, Backend};

/// System message sent ahead of every translation prompt
const SYSTEM_PROMPT: &str = "You are a professional translation assistant. \
Follow the instructions exactly and return only the translated text.";

/// One message in a chat completion exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role, `system` or `user` on requests
    pub role: String,
    /// Message body
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `/chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Conversation history, oldest first
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Create a request carrying a single user prompt
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: None,
        }
    }

    /// Prepend a system message
    pub fn with_system(mut self, content: impl Into<String>) -> Self {
        self.messages.insert(0, ChatMessage::system(content));
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Client for OpenAI-compatible chat completion servers
#[derive(Debug)]
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    client: Client,
}

impl OpenAiClient {
    /// Create a new client for the given API base URL.
    /// Fails when the endpoint is not a valid absolute URL.
    pub fn new(
        endpoint: &str,
        api_key: String,
        model: String,
        temperature: f32,
        timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        let parsed = Url::parse(endpoint).map_err(|e| {
            ConfigError::InvalidValue(format!("invalid OpenAI endpoint {endpoint:?}: {e}"))
        })?;

        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            api_key,
            model,
            temperature,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .pool_idle_timeout(Duration::from_secs(90))
                .pool_max_idle_per_host(20)
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
        })
    }

    /// Configured model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base_url)
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        debug!("Sending chat completion request to {}", self.chat_url());

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
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

        extract_content(&body)
    }
}

/// Pull the assistant text out of a chat completion response body.
/// Falls back to untyped JSON traversal when the typed shape does not fit.
fn extract_content(body: &str) -> Result<String, ProviderError> {
    if let Ok(parsed) = serde_json::from_str::<ChatResponse>(body) {
        if let Some(choice) = parsed.choices.first() {
            let content = choice.message.content.trim();
            if !content.is_empty() {
                return Ok(content.to_string());
            }
        }
    }

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(format!("invalid JSON response: {e}")))?;
    match value["choices"][0]["message"]["content"].as_str() {
        Some(content) if !content.trim().is_empty() => Ok(content.trim().to_string()),
        _ => Err(ProviderError::ParseError(
            "response contained no completion text".to_string(),
        )),
    }
}

#[async_trait]
impl Backend for OpenAiClient {
    async fn request_translation(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatRequest::new(&self.model, prompt)
            .with_system(SYSTEM_PROMPT)
            .with_temperature(self.temperature);
        self.send_chat(&request).await
    }

    async fn check_reachable(&self) -> bool {
        match self
            .client
            .get(self.models_url())
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn describe(&self) -> String {
        format!("openai ({})", self.model)
    }
}
