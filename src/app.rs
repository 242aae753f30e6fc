//! Answer strategies and the session-level application state
//!
//! `QaApp` owns the configuration, the API credentials, and every resource
//! that is expensive to build: the retriever (dataset loaded on first RAG
//! question) and the generators (built on first use, then reused).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::catalog;
use crate::cli::Config;
use crate::errors::{QaError, Result};
use crate::models::{Generator, LocalModel, OpenAiModel};
use crate::rag::{RAGModel, Retriever};

/// Reply when the chosen strategy has no usable key
pub const MISSING_KEY_MESSAGE: &str = "Please provide a valid API key and choose a model.";

/// How a question gets answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Hosted chat-completion API
    Hosted,
    /// Locally loaded language model
    Local,
    /// Catalog lookup + hosted generation
    Rag,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Hosted, Strategy::Local, Strategy::Rag];

    /// Short identifier accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Hosted => "openai",
            Strategy::Local => "local",
            Strategy::Rag => "rag",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Hosted => "OpenAI",
            Strategy::Local => "Hugging Face",
            Strategy::Rag => "RAG with Pokémon Data",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = QaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "hosted" => Ok(Strategy::Hosted),
            "local" | "huggingface" | "hugging-face" | "hf" => Ok(Strategy::Local),
            "rag" => Ok(Strategy::Rag),
            other => Err(QaError::ConfigError(format!(
                "Unknown strategy '{}'. Expected one of: openai, local, rag",
                other
            ))),
        }
    }
}

/// API credentials supplied by the user
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub hf_token: Option<String>,
}

impl Credentials {
    pub fn new(openai_api_key: Option<String>, hf_token: Option<String>) -> Self {
        Self {
            openai_api_key: openai_api_key.filter(|k| !k.trim().is_empty()),
            hf_token: hf_token.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Whether `strategy` has the key it needs
    pub fn permits(&self, strategy: Strategy) -> bool {
        match strategy {
            Strategy::Hosted | Strategy::Rag => self.openai_api_key.is_some(),
            Strategy::Local => self.hf_token.is_some(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<set>"))
            .field("hf_token", &self.hf_token.as_ref().map(|_| "<set>"))
            .finish()
    }
}

/// Session state for answering questions
pub struct QaApp {
    config: Config,
    credentials: Credentials,
    retriever: Option<Retriever>,
    hosted: Option<Arc<dyn Generator>>,
    local: Option<Arc<dyn Generator>>,
}

impl QaApp {
    /// Create new app; nothing is loaded until first needed
    pub fn new(config: Config, credentials: Credentials) -> Self {
        Self {
            config,
            credentials,
            retriever: None,
            hosted: None,
            local: None,
        }
    }

    /// Use an already built retriever instead of loading the dataset
    pub fn with_retriever(mut self, retriever: Retriever) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Use a custom hosted generator
    pub fn with_hosted_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.hosted = Some(generator);
        self
    }

    /// Use a custom local generator
    pub fn with_local_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.local = Some(generator);
        self
    }

    /// Get current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get credentials
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Retriever over the configured dataset, loaded on first call
    pub fn retriever(&mut self) -> Result<&Retriever> {
        if self.retriever.is_none() {
            let path = self.config.dataset_path();
            let format = self.config.dataset_format()?;
            let catalog = catalog::load(&path, format)?;
            self.retriever = Some(Retriever::new(catalog));
        }

        self.retriever
            .as_ref()
            .ok_or_else(|| QaError::Generic("Retriever was not initialised".to_string()))
    }

    fn hosted_generator(&mut self) -> Result<Arc<dyn Generator>> {
        if let Some(generator) = &self.hosted {
            return Ok(Arc::clone(generator));
        }

        let api_key = self
            .credentials
            .openai_api_key
            .clone()
            .ok_or_else(|| QaError::MissingApiKey("OpenAI".to_string()))?;
        let generator: Arc<dyn Generator> =
            Arc::new(OpenAiModel::with_config(api_key, self.config.openai.clone())?);
        self.hosted = Some(Arc::clone(&generator));
        Ok(generator)
    }

    async fn local_generator(&mut self) -> Result<Arc<dyn Generator>> {
        if let Some(generator) = &self.local {
            return Ok(Arc::clone(generator));
        }

        let config = self.config.local.clone();
        let token = self.credentials.hf_token.clone();
        let model = tokio::task::spawn_blocking(move || LocalModel::load(config, token))
            .await
            .map_err(|e| QaError::ModelError(format!("Model loading task failed: {}", e)))?
            .map_err(|e| QaError::ModelError(format!("{:#}", e)))?;

        let generator: Arc<dyn Generator> = Arc::new(model);
        self.local = Some(Arc::clone(&generator));
        Ok(generator)
    }

    /// Answer a question with the given strategy
    ///
    /// Only a blank question is an error. Missing keys, dataset problems and
    /// generation failures are reported in the returned text.
    pub async fn answer(&mut self, strategy: Strategy, question: &str) -> Result<String> {
        if question.trim().is_empty() {
            return Err(QaError::EmptyQuestion);
        }

        if !self.credentials.permits(strategy) {
            tracing::warn!(%strategy, "No API key for strategy");
            return Ok(MISSING_KEY_MESSAGE.to_string());
        }

        tracing::info!(%strategy, "Answering question");

        let response = match strategy {
            Strategy::Hosted => match self.hosted_generator() {
                Ok(generator) => generator.get_response(question).await,
                Err(e) => format!("Error: {}", e),
            },
            Strategy::Local => match self.local_generator().await {
                Ok(generator) => generator.get_response(question).await,
                Err(e) => format!("Error: {}", e),
            },
            Strategy::Rag => match self.rag_model() {
                Ok(model) => model.get_response(question).await,
                Err(e) => format!("Error: {}", e),
            },
        };

        Ok(response)
    }

    /// Context sentence the RAG strategy would use, without generating
    pub fn context_for(&mut self, question: &str) -> Result<String> {
        let retriever = self.retriever()?.clone();
        crate::rag::ContextBuilder::new(retriever).build(question)
    }

    fn rag_model(&mut self) -> Result<RAGModel> {
        let retriever = self.retriever()?.clone();
        let generator = self.hosted_generator()?;
        Ok(RAGModel::new(retriever, generator))
    }
}
