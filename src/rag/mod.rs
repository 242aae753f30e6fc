// Retrieval-augmented generation over the Pokémon Go catalog
//
// Components:
// - Retrieval: name search and DPS lookups against the catalog
// - Ranking: derived damage-per-second scores, computed per call
// - Context Builder: keyword routing and fact sentences
// - Pipeline: context + generator

pub mod retrieval;
pub mod ranking;
pub mod context;
pub mod pipeline;

// Re-export key types
pub use retrieval::Retriever;
pub use ranking::{DpsScore, DpsTable, ScoredEntry};
pub use context::{ContextBuilder, QueryIntent};
pub use pipeline::{RAGModel, RAGResult};
