// DPS ranking over catalog entries
pub mod scorer;

pub use scorer::{DpsScore, DpsTable, ScoredEntry};
