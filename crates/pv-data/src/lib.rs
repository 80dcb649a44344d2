//! Photo data loading: sources, normalization and configuration

pub mod config;
pub mod normalize;
pub mod sources;

use thiserror::Error;

// Re-exports
pub use config::SourceConfig;
pub use normalize::{normalize_records, parse_records};
pub use sources::{HttpPhotoSource, JsonFilePhotoSource};

/// Errors that can occur while loading photo data
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: failed to fetch photos")]
    HttpStatus { status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Malformed record at index {index}: `{field}` {reason}")]
    MalformedRecord {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("Duplicate photo id {id} at index {index}")]
    DuplicateId { id: u64, index: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for DataError {
    fn from(error: serde_json::Error) -> Self {
        DataError::Parse(error.to_string())
    }
}
