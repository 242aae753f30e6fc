// Catalog retrieval
pub mod engine;

pub use engine::Retriever;
