//! Answer generators
//!
//! - Hosted chat-completion API (`OpenAiModel`)
//! - Locally loaded causal language model (`LocalModel`)
//!
//! Both implement the `Generator` trait used by the RAG pipeline and the app.

pub mod local;
pub mod openai;
pub mod types;

// Re-export key types for convenience
pub use local::LocalModel;
pub use openai::OpenAiModel;
pub use types::{system_instruction, Generator, LocalModelConfig, OpenAiConfig, SYSTEM_INSTRUCTION};
