//! Hosted chat-completion client
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint. One system
//! message frames the assistant; retrieved context is appended to it.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{QaError, Result};
use crate::models::types::{system_instruction, Generator, OpenAiConfig};

/// Chat message in request and response payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

/// Body of a chat-completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Hosted model client
#[derive(Clone)]
pub struct OpenAiModel {
    client: Client,
    api_key: String,
    config: OpenAiConfig,
}

impl std::fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OpenAiModel {
    /// Create client with default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, OpenAiConfig::default())
    }

    /// Create client with custom settings
    pub fn with_config(api_key: impl Into<String>, config: OpenAiConfig) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(QaError::MissingApiKey("OpenAI".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(QaError::HttpError)?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    /// Build the request body for a prompt
    ///
    /// Context-augmented requests also carry the configured temperature.
    pub fn build_request(&self, prompt: &str, context: Option<&str>) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::new("system", system_instruction(context)),
                ChatMessage::new("user", prompt),
            ],
            max_tokens: self.config.max_tokens,
            temperature: context.map(|_| self.config.rag_temperature),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Get current settings
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }
}

/// Pull the first choice's content out of a response body
fn parse_completion(body: &str) -> Result<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body)?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| QaError::OpenAiApiError("Response contained no message content".to_string()))
}

/// Readable message from an error response body
fn parse_error_body(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .map(|r| r.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait]
impl Generator for OpenAiModel {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &str, context: Option<&str>) -> Result<String> {
        let request = self.build_request(prompt, context);

        tracing::debug!(
            model = %request.model,
            with_context = context.is_some(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| QaError::OpenAiApiError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(QaError::OpenAiApiError(format!(
                "HTTP {}: {}",
                status,
                parse_error_body(&body)
            )));
        }

        parse_completion(&body)
    }
}
