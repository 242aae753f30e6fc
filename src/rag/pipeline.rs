// End-to-end RAG: catalog context + hosted generation
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::Generator;
use crate::rag::context::ContextBuilder;
use crate::rag::retrieval::Retriever;

/// RAG pipeline result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RAGResult {
    /// Original question
    pub query: String,
    /// Context sentence appended to the system instruction
    pub context: String,
    /// Generated answer
    pub response: String,
}

/// Retrieval-augmented answer model
pub struct RAGModel {
    context_builder: ContextBuilder,
    generator: Arc<dyn Generator>,
}

impl RAGModel {
    /// Create new RAG model over a retriever and a generator
    pub fn new(retriever: Retriever, generator: Arc<dyn Generator>) -> Self {
        Self {
            context_builder: ContextBuilder::new(retriever),
            generator,
        }
    }

    /// Context sentence for a question
    pub fn retrieve_context(&self, query: &str) -> Result<String> {
        self.context_builder.build(query)
    }

    /// Execute pipeline: retrieve context -> generate
    pub async fn execute(&self, query: &str) -> Result<RAGResult> {
        let context = self.retrieve_context(query)?;

        tracing::info!(backend = self.generator.name(), %context, "Retrieved context");

        let response = self.generator.generate(query, Some(&context)).await?;

        Ok(RAGResult {
            query: query.to_string(),
            context,
            response,
        })
    }

    /// Answer a question; retrieval and generation failures become
    /// `Error: ...` text
    pub async fn get_response(&self, query: &str) -> String {
        match self.execute(query).await {
            Ok(result) => result.response,
            Err(e) => {
                tracing::error!(error = %e, "RAG pipeline failed");
                format!("Error: {}", e)
            }
        }
    }
}
