//! Error types for vxsearch operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all vxsearch crates. Uses `thiserror` for derive macros.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in vxsearch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error with the path that caused it.
    #[error("I/O error at {path}: {source}")]
    IoWithPath {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data or format.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A single embedding backend failed (network, auth, bad response).
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Stored vectors disagree on their dimension, or the store is unusable.
    #[error("Corpus integrity error: {0}")]
    CorpusIntegrity(String),

    /// A vector's length does not match the corpus dimension.
    #[error("Dimension mismatch: expected {expected}, got {actual} from {origin}")]
    DimensionMismatch {
        /// Corpus dimension.
        expected: usize,
        /// Length actually observed.
        actual: usize,
        /// Where the offending vector came from.
        origin: String,
    },

    /// Neither a remote credential+client nor a local model is usable.
    #[error("No embedding backend available: {0}")]
    NoEmbeddingBackendAvailable(String),

    /// Both the remote attempt and the local fallback failed.
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// Generic operation failure.
    #[error("Operation failed: {0}")]
    Operation(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create an embedding backend error.
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create an embedding backend error carrying its underlying cause.
    pub fn embedding_with_source(msg: &str, source: impl std::fmt::Display) -> Self {
        Self::Embedding(format!("{msg}: {source}"))
    }

    /// Create a corpus integrity error.
    pub fn corpus(msg: impl Into<String>) -> Self {
        Self::CorpusIntegrity(msg.into())
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize, origin: impl Into<String>) -> Self {
        Self::DimensionMismatch {
            expected,
            actual,
            origin: origin.into(),
        }
    }

    /// Create a "no backend" error.
    pub fn no_backend(msg: impl Into<String>) -> Self {
        Self::NoEmbeddingBackendAvailable(msg.into())
    }

    /// Create an "embedding unavailable" error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::EmbeddingUnavailable(msg.into())
    }

    /// Create a generic operation error.
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Wrap an I/O error with the path that produced it.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias using vxsearch's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_pick_variants() {
        assert!(matches!(Error::config("x"), Error::Config(_)));
        assert!(matches!(Error::corpus("x"), Error::CorpusIntegrity(_)));
        assert!(matches!(
            Error::no_backend("x"),
            Error::NoEmbeddingBackendAvailable(_)
        ));
        assert!(matches!(
            Error::unavailable("x"),
            Error::EmbeddingUnavailable(_)
        ));
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = Error::dimension_mismatch(384, 768, "bge-base-en-v1.5");
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected 384, got 768 from bge-base-en-v1.5"
        );
    }

    #[test]
    fn test_embedding_with_source() {
        let err = Error::embedding_with_source("request failed", "connection refused");
        assert_eq!(
            err.to_string(),
            "Embedding error: request failed: connection refused"
        );
    }

    #[test]
    fn test_io_with_path_mentions_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::io_with_path(io, "/data/store.jsonl");
        assert!(err.to_string().contains("/data/store.jsonl"));
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
