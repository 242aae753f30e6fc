//! Error types for pokequery
//!
//! Load, retrieval, and generation failures share one enum so callers can
//! match on the kind instead of inspecting strings.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the pokequery crate
#[derive(Error, Debug)]
pub enum QaError {
    /// Dataset file does not exist
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Dataset file has no header row
    #[error("Empty data error: no columns to parse from {}", path.display())]
    EmptyData { path: PathBuf },

    /// Dataset content could not be parsed in the requested format
    #[error("Parser error ({format}): {message}")]
    ParseError { format: String, message: String },

    /// File extension or format name is not recognised
    #[error("Unsupported data format: {0}")]
    UnsupportedFormat(String),

    /// Required columns are absent from the dataset header
    #[error("Schema error: missing required column(s): {}", missing.join(", "))]
    SchemaError { missing: Vec<String> },

    /// A numeric cell could not be read as a number
    #[error("Invalid value {value:?} in column {column} at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    /// Arg-max requested over a catalog with no entries
    #[error("Cannot compute highest DPS: catalog is empty")]
    EmptyCatalog,

    /// Every entry had a zero or non-finite move duration
    #[error("Cannot compute highest DPS: no entry has usable move durations ({} skipped: {})", entries.len(), entries.join(", "))]
    DegenerateData { entries: Vec<String> },

    /// No API key or token was supplied for the chosen strategy
    #[error("Missing API key for {0}")]
    MissingApiKey(String),

    /// Blank question submitted
    #[error("Question must not be empty")]
    EmptyQuestion,

    /// Hosted chat-completion API errors
    #[error("OpenAI API error: {0}")]
    OpenAiApiError(String),

    /// Local model load or inference errors
    #[error("Model error: {0}")]
    ModelError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for pokequery operations
pub type Result<T> = std::result::Result<T, QaError>;

/// Convert anyhow errors to QaError
impl From<anyhow::Error> for QaError {
    fn from(err: anyhow::Error) -> Self {
        QaError::Generic(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_every_column() {
        let err = QaError::SchemaError {
            missing: vec!["FAST_MOVE".to_string(), "CHARGE_MOVE_DURATION".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("FAST_MOVE"));
        assert!(msg.contains("CHARGE_MOVE_DURATION"));
    }

    #[test]
    fn test_file_not_found_display() {
        let err = QaError::FileNotFound {
            path: PathBuf::from("data/missing.csv"),
        };
        assert_eq!(err.to_string(), "File not found: data/missing.csv");
    }

    #[test]
    fn test_degenerate_data_counts_entries() {
        let err = QaError::DegenerateData {
            entries: vec!["Ditto".to_string(), "Shedinja".to_string()],
        };
        assert!(err.to_string().contains("2 skipped"));
        assert!(err.to_string().contains("Ditto"));
    }

    #[test]
    fn test_anyhow_conversion_keeps_context() {
        let err: QaError = anyhow::anyhow!("inner").context("outer").into();
        assert_eq!(err.to_string(), "outer: inner");
    }
}
