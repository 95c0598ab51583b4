//! Embedding backend traits and mock implementations.
//!
//! This module defines the `EmbeddingBackend` trait that abstracts over
//! embedding generation (OpenAI, fastembed, ...), plus the two factory
//! traits the gateway uses to obtain backends once it knows what it needs:
//!
//! - `RemoteBackendFactory`: builds a remote client for an API key and a
//!   corpus dimension
//! - `LocalModelLoader`: loads a local model by name
//!
//! # Mocks
//!
//! - `MockEmbeddingBackend`: Deterministic normalized vectors for testing
//! - `FailingBackend`: Always errors, for exercising fallback
//! - `MockRemoteFactory` / `MockModelLoader`: hand out the above

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use vxsearch_core::{Error, Result};

/// Trait for generating text embeddings.
///
/// Implementations wrap specific embedding services and provide a uniform
/// async interface. The trait requires `Send + Sync` so a backend can be
/// shared behind an `Arc`.
///
/// # Thread Safety
///
/// Implementations should handle internal synchronization (e.g., `Arc<Mutex<>>`)
/// for thread-unsafe underlying libraries.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for a batch of texts, in input order.
    ///
    /// Default implementation calls `embed` for each text sequentially.
    /// Backends that support native batching should override this.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// The embedding dimension this backend produces.
    fn dimension(&self) -> usize;

    /// The backend name for diagnostics.
    fn name(&self) -> &str;
}

/// Builds a remote embedding backend.
///
/// The remote client needs the credential and the corpus dimension, neither
/// of which is known until the pipeline runs.
pub trait RemoteBackendFactory: Send + Sync {
    /// Create a client authenticated with `api_key` producing `dimension`-length vectors.
    fn create(&self, api_key: &str, dimension: usize) -> Result<Arc<dyn EmbeddingBackend>>;
}

/// Loads local embedding models by name.
#[async_trait]
pub trait LocalModelLoader: Send + Sync {
    /// Load (and, if needed, download) the named model.
    async fn load(&self, model: &str) -> Result<Arc<dyn EmbeddingBackend>>;
}

// ============================================================================
// Mock backends
// ============================================================================

/// A mock embedding backend for testing.
///
/// Generates deterministic vectors based on the input text bytes, or always
/// returns one fixed vector when built with [`MockEmbeddingBackend::fixed`].
pub struct MockEmbeddingBackend {
    dimension: usize,
    fixed: Option<Vec<f32>>,
    name: String,
}

impl MockEmbeddingBackend {
    /// Create a new mock backend with the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            fixed: None,
            name: "mock".to_string(),
        }
    }

    /// Create a mock that embeds every text as `vector`.
    pub fn fixed(vector: Vec<f32>) -> Self {
        Self {
            dimension: vector.len(),
            fixed: Some(vector),
            name: "mock".to_string(),
        }
    }

    /// Override the reported backend name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Generate a deterministic embedding from text.
    fn deterministic_embedding(&self, text: &str) -> Vec<f32> {
        if let Some(fixed) = &self.fixed {
            return fixed.clone();
        }

        let mut embedding = vec![0.0f32; self.dimension];
        let bytes = text.as_bytes();

        for (i, val) in embedding.iter_mut().enumerate() {
            let byte_val = if bytes.is_empty() {
                0u8
            } else {
                bytes[i % bytes.len()]
            };
            *val = ((byte_val as f32 + i as f32) % 256.0) / 256.0;
        }

        // Normalize to unit vector
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for val in &mut embedding {
                *val /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingBackend for MockEmbeddingBackend {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.deterministic_embedding(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| self.deterministic_embedding(t))
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A backend whose every call fails.
pub struct FailingBackend {
    dimension: usize,
    message: String,
}

impl FailingBackend {
    /// Create a failing backend that reports `message`.
    pub fn new(dimension: usize, message: impl Into<String>) -> Self {
        Self {
            dimension,
            message: message.into(),
        }
    }
}

#[async_trait]
impl EmbeddingBackend for FailingBackend {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::embedding(self.message.clone()))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Remote factory handing out one prebuilt backend.
pub struct MockRemoteFactory {
    backend: Arc<dyn EmbeddingBackend>,
}

impl MockRemoteFactory {
    /// Wrap a backend.
    pub fn new(backend: Arc<dyn EmbeddingBackend>) -> Self {
        Self { backend }
    }
}

impl RemoteBackendFactory for MockRemoteFactory {
    fn create(&self, _api_key: &str, _dimension: usize) -> Result<Arc<dyn EmbeddingBackend>> {
        Ok(self.backend.clone())
    }
}

/// Local loader that returns mock backends and records what was loaded.
pub struct MockModelLoader {
    dimension: usize,
    fixed: Option<Vec<f32>>,
    loaded: Mutex<Vec<String>>,
}

impl MockModelLoader {
    /// Loader producing deterministic mocks of `dimension`.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            fixed: None,
            loaded: Mutex::new(Vec::new()),
        }
    }

    /// Loader producing mocks that always return `vector`.
    pub fn fixed(vector: Vec<f32>) -> Self {
        Self {
            dimension: vector.len(),
            fixed: Some(vector),
            loaded: Mutex::new(Vec::new()),
        }
    }

    /// Names of the models loaded so far, in order.
    pub fn loaded(&self) -> Vec<String> {
        self.loaded.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LocalModelLoader for MockModelLoader {
    async fn load(&self, model: &str) -> Result<Arc<dyn EmbeddingBackend>> {
        self.loaded
            .lock()
            .map_err(|e| Error::operation(format!("Mutex poisoned: {e}")))?
            .push(model.to_string());

        let backend = match &self.fixed {
            Some(v) => MockEmbeddingBackend::fixed(v.clone()),
            None => MockEmbeddingBackend::new(self.dimension),
        };
        Ok(Arc::new(backend.with_name(model)))
    }
}

// ============================================================================
// Tests
// ============================================================================
