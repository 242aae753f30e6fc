//! pokequery - Pokémon Go question answering
//!
//! Answers free-text questions three ways:
//!
//! - **Hosted**: chat-completion API
//! - **Local**: a Llama-family model downloaded from the Hugging Face Hub
//! - **RAG**: facts retrieved from a tabular stats catalog, passed as context
//!   to the hosted model
//!
//! The catalog is loaded once from CSV, TSV, Excel, or Parquet and shared
//! read-only; DPS values are derived per query.

pub mod errors;
pub mod catalog;
pub mod rag;
pub mod models;
pub mod app;
pub mod cli;
pub mod repl;
pub mod logging;

// Re-export commonly used types
pub use errors::{QaError, Result};
pub use app::{Credentials, QaApp, Strategy};
pub use catalog::{Catalog, Entry, MoveStats};
pub use rag::{RAGModel, Retriever};
