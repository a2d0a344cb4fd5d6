//! Error types for cellgrid core.

use thiserror::Error;

/// Errors surfaced to callers of the sheet and its storage.
///
/// Formula failures are not here: they become the `ERROR` display sentinel instead.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid cell key: {0}")]
    InvalidCellKey(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Search term is empty")]
    EmptySearch,

    #[error("Unknown aggregate: {0}")]
    UnknownAggregate(String),
}

pub type Result<T> = std::result::Result<T, GridError>;
