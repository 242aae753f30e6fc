//! Generator interface and model settings
//!
//! Every answer strategy ends in a `Generator`: something that turns a
//! prompt, plus an optional retrieved context sentence, into free text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Base system instruction for the hosted model
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant with expert knowledge of Pokémon Go. \
     Keep your response to 150 tokens only.";

/// System instruction with retrieved context appended
pub fn system_instruction(context: Option<&str>) -> String {
    match context {
        Some(context) => format!("{} Additional context: {}.", SYSTEM_INSTRUCTION, context),
        None => SYSTEM_INSTRUCTION.to_string(),
    }
}

/// Free-text generation backend
#[async_trait]
pub trait Generator: Send + Sync {
    /// Short backend name for logs and banners
    fn name(&self) -> &str;

    /// Generate a response to `prompt`, optionally grounded in `context`
    async fn generate(&self, prompt: &str, context: Option<&str>) -> Result<String>;

    /// Generate without context, rendering failures as `Error: ...`
    async fn get_response(&self, prompt: &str) -> String {
        match self.generate(prompt, None).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(backend = self.name(), error = %e, "Generation failed");
                format!("Error: {}", e)
            }
        }
    }
}

/// Hosted chat-completion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,
    pub model: String,
    /// Response budget in generated tokens
    pub max_tokens: u32,
    /// Sampling temperature sent with context-augmented requests
    pub rag_temperature: f32,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 150,
            rag_temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

/// Local causal language model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalModelConfig {
    /// Hugging Face hub repository
    pub model_id: String,
    pub revision: String,
    /// Total sequence length, prompt included
    pub max_length: usize,
}

impl Default for LocalModelConfig {
    fn default() -> Self {
        Self {
            model_id: "TinyLlama/TinyLlama_v1.1".to_string(),
            revision: "main".to_string(),
            max_length: 100,
        }
    }
}
