//! FastEmbed local embedding backend.
//!
//! Wraps the `fastembed` crate to provide local embedding generation
//! via pre-trained models (e.g., AllMiniLM, BGE).
//!
//! # Thread Safety
//!
//! `fastembed::TextEmbedding` is not `Send + Sync`, so we wrap it in
//! `Arc<Mutex<>>` and use `tokio::task::spawn_blocking` for embedding calls.
//!
//! # Feature Gate
//!
//! This module requires the `local-embeddings` feature.

use crate::embedding::{EmbeddingBackend, LocalModelLoader};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use vxsearch_core::{Error, Result};

/// Map a model name string to a fastembed `EmbeddingModel` enum variant.
///
/// Names are matched case-insensitively, so sentence-transformers style
/// names like `all-MiniLM-L6-v2` resolve too.
fn resolve_model(name: &str) -> Result<fastembed::EmbeddingModel> {
    match name.to_ascii_lowercase().as_str() {
        "all-minilm-l6-v2" | "allminilml6v2" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" | "allminilml12v2" => Ok(fastembed::EmbeddingModel::AllMiniLML12V2),
        "all-mpnet-base-v2" | "allmpnetbasev2" => Ok(fastembed::EmbeddingModel::AllMpnetBaseV2),
        "bge-small-en-v1.5" | "bgesmallenv15" => Ok(fastembed::EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" | "bgebaseenv15" => Ok(fastembed::EmbeddingModel::BGEBaseENV15),
        "bge-large-en-v1.5" | "bgelargeenv15" => Ok(fastembed::EmbeddingModel::BGELargeENV15),
        _ => Err(Error::config(format!(
            "Unknown embedding model: '{name}'. Supported: all-minilm-l6-v2, all-minilm-l12-v2, all-mpnet-base-v2, bge-small-en-v1.5, bge-base-en-v1.5, bge-large-en-v1.5"
        ))),
    }
}

/// FastEmbed-based embedding backend.
///
/// Uses locally-downloaded transformer models; output vectors are
/// unit-normalized. The model is loaded once and reused for all calls.
///
/// # Supported Models
///
/// | Name | Dimension | Size |
/// |------|-----------|------|
/// | `all-minilm-l6-v2` | 384 | ~80MB |
/// | `all-minilm-l12-v2` | 384 | ~120MB |
/// | `all-mpnet-base-v2` | 768 | ~440MB |
/// | `bge-small-en-v1.5` | 384 | ~50MB |
/// | `bge-base-en-v1.5` | 768 | ~130MB |
/// | `bge-large-en-v1.5` | 1024 | ~335MB |
pub struct FastEmbedBackend {
    model: Arc<Mutex<fastembed::TextEmbedding>>,
    dimension: usize,
    model_name: String,
}

impl FastEmbedBackend {
    /// Load a FastEmbed model by name.
    ///
    /// Downloads the model if not cached locally. This blocks; async callers
    /// should go through [`FastEmbedLoader`].
    ///
    /// # Arguments
    ///
    /// * `model_name` - Model identifier (e.g., "all-minilm-l6-v2")
    /// * `cache_path` - Optional directory for model file caching
    pub fn new(model_name: &str, cache_path: Option<&str>) -> Result<Self> {
        let model_enum = resolve_model(model_name)?;

        let mut init = fastembed::InitOptions::new(model_enum);
        if let Some(path) = cache_path {
            init = init.with_cache_dir(std::path::PathBuf::from(path));
        }

        let mut text_embedding = fastembed::TextEmbedding::try_new(init)
            .map_err(|e| Error::operation(format!("Failed to initialize fastembed model: {e}")))?;

        // Probe dimension via a test embedding
        let probe = text_embedding
            .embed(vec!["dimension probe"], None)
            .map_err(|e| Error::operation(format!("Failed to probe embedding dimension: {e}")))?;

        let dimension = probe
            .first()
            .map(|v| v.len())
            .ok_or_else(|| Error::operation("Empty probe embedding"))?;

        log::info!("Loaded local model {model_name} ({dimension}d)");

        Ok(Self {
            model: Arc::new(Mutex::new(text_embedding)),
            dimension,
            model_name: model_name.to_string(),
        })
    }
}

#[async_trait]
impl EmbeddingBackend for FastEmbedBackend {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::embedding("No embedding returned"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let model = self.model.clone();
        let texts: Vec<String> = texts.iter().map(|t| t.to_string()).collect();

        tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|e| Error::operation(format!("Mutex poisoned: {e}")))?;
            model
                .embed(texts, None)
                .map_err(|e| Error::embedding(format!("Batch embedding failed: {e}")))
        })
        .await
        .map_err(|e| Error::operation(format!("spawn_blocking failed: {e}")))?
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

impl std::fmt::Debug for FastEmbedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedBackend")
            .field("model", &self.model_name)
            .field("dimension", &self.dimension)
            .finish()
    }
}

/// Loads [`FastEmbedBackend`]s off the async runtime.
#[derive(Debug, Clone, Default)]
pub struct FastEmbedLoader {
    cache_path: Option<String>,
}

impl FastEmbedLoader {
    /// Create a loader caching model files under `cache_path`.
    pub fn new(cache_path: Option<String>) -> Self {
        Self { cache_path }
    }
}

#[async_trait]
impl LocalModelLoader for FastEmbedLoader {
    async fn load(&self, model: &str) -> Result<Arc<dyn EmbeddingBackend>> {
        let model = model.to_string();
        let cache_path = self.cache_path.clone();

        let backend = tokio::task::spawn_blocking(move || {
            FastEmbedBackend::new(&model, cache_path.as_deref())
        })
        .await
        .map_err(|e| Error::operation(format!("spawn_blocking failed: {e}")))??;

        Ok(Arc::new(backend))
    }
}

// ============================================================================
// Tests
// ============================================================================
