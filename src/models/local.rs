// Local causal language model via Candle (TinyLlama by default)
use anyhow::{Context, Result};
use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::llama::{Cache, Config, Llama, LlamaConfig};
use hf_hub::{api::sync::ApiBuilder, Repo, RepoType};
use std::sync::Arc;
use tokenizers::Tokenizer;

use crate::errors::QaError;
use crate::models::types::{Generator, LocalModelConfig};

const EOS_TOKEN: &str = "</s>";
const SEED: u64 = 299792458;

/// Prompt actually fed to the model
pub fn compose_prompt(prompt: &str, context: Option<&str>) -> String {
    match context {
        Some(context) => format!("Context: {}\n\n{}", context, prompt),
        None => prompt.to_string(),
    }
}

struct LoadedModel {
    model: Llama,
    config: Config,
    tokenizer: Tokenizer,
    device: Device,
    eos_token_id: Option<u32>,
}

impl LoadedModel {
    /// Greedy decoding until `max_length` total tokens or end of sequence.
    /// Returns the decoded prompt and continuation.
    fn generate(&self, prompt: &str, max_length: usize) -> Result<String> {
        let encoding = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;
        let mut tokens = encoding.get_ids().to_vec();
        let prompt_len = tokens.len();

        if prompt_len >= max_length {
            tracing::warn!(
                prompt_len,
                max_length,
                "Prompt already fills the generation length"
            );
        }

        let mut cache = Cache::new(true, DType::F32, &self.config, &self.device)
            .context("Failed to create KV cache")?;
        // No temperature and no top-p means arg-max sampling
        let mut logits_processor = LogitsProcessor::new(SEED, None, None);

        let mut index_pos = 0;
        while tokens.len() < max_length {
            let context_size = if index_pos > 0 { 1 } else { tokens.len() };
            let start = tokens.len() - context_size;
            let input = Tensor::new(&tokens[start..], &self.device)?.unsqueeze(0)?;

            let logits = self.model.forward(&input, index_pos, &mut cache)?;
            let logits = logits.squeeze(0)?;
            index_pos += context_size;

            let next_token = logits_processor.sample(&logits)?;
            tokens.push(next_token);

            if Some(next_token) == self.eos_token_id {
                tracing::debug!("Generation stopped: EOS token");
                break;
            }
        }

        tracing::debug!(generated = tokens.len() - prompt_len, "Local generation finished");

        let text = self
            .tokenizer
            .decode(&tokens, true)
            .map_err(|e| anyhow::anyhow!("Decoding failed: {}", e))?;

        Ok(text.trim().to_string())
    }
}

/// Locally loaded Llama-family model
pub struct LocalModel {
    inner: Arc<LoadedModel>,
    config: LocalModelConfig,
}

impl LocalModel {
    /// Download (first use) and load the model. Blocking.
    pub fn load(config: LocalModelConfig, hf_token: Option<String>) -> Result<Self> {
        let device = Device::Cpu;

        tracing::info!(model_id = %config.model_id, "Loading local model");

        let api = ApiBuilder::new()
            .with_token(hf_token)
            .build()
            .context("Failed to create HuggingFace API client")?;
        let repo = api.repo(Repo::with_revision(
            config.model_id.clone(),
            RepoType::Model,
            config.revision.clone(),
        ));

        let config_path = repo.get("config.json")
            .context("Failed to download model config")?;
        let tokenizer_path = repo.get("tokenizer.json")
            .context("Failed to download tokenizer")?;
        let weights_path = repo.get("model.safetensors")
            .context("Failed to download model weights")?;

        let config_contents = std::fs::read(&config_path)
            .context("Failed to read config file")?;
        let llama_config: LlamaConfig = serde_json::from_slice(&config_contents)
            .context("Failed to parse model config")?;
        let model_config = llama_config.into_config(false);

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        let eos_token_id = tokenizer.token_to_id(EOS_TOKEN);

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .context("Failed to load model weights")?
        };
        let model = Llama::load(vb, &model_config).context("Failed to create Llama model")?;

        tracing::info!("Local model loaded");

        Ok(Self {
            inner: Arc::new(LoadedModel {
                model,
                config: model_config,
                tokenizer,
                device,
                eos_token_id,
            }),
            config,
        })
    }

    /// Get current settings
    pub fn config(&self) -> &LocalModelConfig {
        &self.config
    }
}

#[async_trait]
impl Generator for LocalModel {
    fn name(&self) -> &str {
        "local"
    }

    async fn generate(&self, prompt: &str, context: Option<&str>) -> crate::Result<String> {
        let inner = Arc::clone(&self.inner);
        let prompt = compose_prompt(prompt, context);
        let max_length = self.config.max_length;

        tokio::task::spawn_blocking(move || inner.generate(&prompt, max_length))
            .await
            .map_err(|e| QaError::ModelError(format!("Inference task failed: {}", e)))?
            .map_err(|e| QaError::ModelError(format!("{:#}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_prompt_without_context() {
        assert_eq!(compose_prompt("Hello", None), "Hello");
    }

    #[test]
    fn test_compose_prompt_with_context() {
        assert_eq!(
            compose_prompt("Best attacker?", Some("Mewtwo has 30.5 DPS")),
            "Context: Mewtwo has 30.5 DPS\n\nBest attacker?"
        );
    }

    #[test]
    #[ignore] // Integration test - requires model download
    fn test_local_generation_length() {
        let model = LocalModel::load(LocalModelConfig::default(), None)
            .expect("Failed to load model");
        let text = model
            .inner
            .generate("Pikachu is", 20)
            .expect("Failed to generate");
        assert!(text.starts_with("Pikachu is"));
    }
}
