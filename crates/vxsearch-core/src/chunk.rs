//! The stored retrieval unit.

use serde::{Deserialize, Serialize};

/// A passage of text together with its precomputed embedding.
///
/// Owned by the vector store; immutable for the lifetime of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Identifier, unique within a store.
    pub id: String,

    /// Embedding vector. Every chunk in a store has the same length.
    pub vector: Vec<f32>,

    /// The passage itself.
    pub text: String,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(id: impl Into<String>, vector: Vec<f32>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vector,
            text: text.into(),
        }
    }

    /// The embedding dimension.
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}
