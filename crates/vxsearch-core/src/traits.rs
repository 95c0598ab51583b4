//! Collaborator contracts for the retrieval pipeline.
//!
//! The pipeline never touches a store file or a secret directly. It talks to
//! a [`VectorStore`] for chunks and to a [`CredentialSource`] for the remote
//! API key, so both can be swapped out in tests and by embedders.

use crate::{Chunk, Result};

/// Read access to a collection of embedded chunks.
///
/// Implementations expose an ordered id index plus random access by id.
/// The order returned by [`chunk_ids`](VectorStore::chunk_ids) is the
/// store order, and it breaks ranking ties, so it must be stable across
/// calls.
///
/// # Example
///
/// ```
/// use vxsearch_core::{Chunk, Error, Result, VectorStore};
///
/// struct OneChunk(Chunk);
///
/// impl VectorStore for OneChunk {
///     fn chunk_ids(&self) -> Result<Vec<String>> {
///         Ok(vec![self.0.id.clone()])
///     }
///
///     fn get_chunk(&self, id: &str) -> Result<Chunk> {
///         if id == self.0.id {
///             Ok(self.0.clone())
///         } else {
///             Err(Error::not_found(id))
///         }
///     }
/// }
///
/// let store = OneChunk(Chunk::new("c1", vec![1.0], "hello"));
/// assert_eq!(store.chunk_ids().unwrap(), vec!["c1".to_string()]);
/// ```
pub trait VectorStore: Send + Sync {
    /// All chunk ids in store order.
    fn chunk_ids(&self) -> Result<Vec<String>>;

    /// Fetch one chunk by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) for unknown ids,
    /// or an I/O / data error if the chunk cannot be read.
    fn get_chunk(&self, id: &str) -> Result<Chunk>;
}

/// Source of the remote embedding API key.
///
/// `None` means no credential is configured; the resolver then skips the
/// remote backend.
pub trait CredentialSource: Send + Sync {
    /// The API key, if one is available.
    fn api_key(&self) -> Option<String>;
}

impl CredentialSource for Option<String> {
    fn api_key(&self) -> Option<String> {
        self.clone()
    }
}
