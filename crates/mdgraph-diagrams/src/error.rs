//! Error types for parsing diagram names

use thiserror::Error;

/// Errors raised while interpreting diagram types and formats
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    /// Unknown diagram type
    #[error("Unsupported diagram type: {0}")]
    UnsupportedType(String),

    /// Unknown image format
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Tool command line could not be parsed
    #[error("Invalid tool command: {0}")]
    InvalidCommand(String),
}

/// Result type for diagram type parsing
pub type Result<T> = std::result::Result<T, DiagramError>;
