//! Error types for ragchat.
//!
//! This module defines a unified error enum covering configuration, I/O,
//! snapshot integrity, embedding, generation and prompt failures.

use thiserror::Error;

/// Unified error type for ragchat.
///
/// All fallible library functions return `Result<T, AppError>`.
/// Errors are represented and propagated, never panicked on.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot is malformed or internally inconsistent
    #[error("Corrupt knowledge store: {0}")]
    CorruptStore(String),

    /// Embedding provider unavailable or returned unusable vectors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// External text generation failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// Knowledge base build and query errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::CorruptStore("missing field `content`".to_string());
        assert_eq!(
            err.to_string(),
            "Corrupt knowledge store: missing field `content`"
        );

        let err = AppError::Generation("timed out".to_string());
        assert_eq!(err.to_string(), "Generation error: timed out");
    }

    #[test]
    fn test_from_serde_json() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: AppError = parse.unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
