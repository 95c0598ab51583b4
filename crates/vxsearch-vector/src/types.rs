//! Common types for the retrieval pipeline.
//!
//! Backend configuration, the in-memory corpus, and the ranking/result
//! records shared by the ranker, formatter, and pipeline.

use serde::{Deserialize, Serialize};
use vxsearch_core::credentials::DEFAULT_API_KEY_ENV;
use vxsearch_core::{Error, Result};

// ============================================================================
// Configuration
// ============================================================================

/// Remote (OpenAI-compatible) embedding backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Whether the remote client may be used at all.
    pub enabled: bool,

    /// Embeddings endpoint URL.
    pub endpoint: String,

    /// Remote model name.
    pub model: String,

    /// The model's full output dimension.
    pub native_dimension: usize,

    /// Corpus dimensions the remote model can serve.
    pub dimensions: Vec<usize>,

    /// API key; takes precedence over `api_key_env`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable consulted when `api_key` is unset.
    pub api_key_env: String,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.openai.com/v1/embeddings".to_string(),
            model: "text-embedding-3-large".to_string(),
            native_dimension: 3072,
            dimensions: vec![1536, 3072],
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: None,
        }
    }
}

/// Maps a corpus dimension to the local model that produces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMapping {
    /// Output dimension of the model.
    pub dimension: usize,
    /// Local model name (e.g., "all-minilm-l6-v2").
    pub model: String,
}

impl ModelMapping {
    /// Create a mapping entry.
    pub fn new(dimension: usize, model: impl Into<String>) -> Self {
        Self {
            dimension,
            model: model.into(),
        }
    }
}

/// Local embedding backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Whether a local model may be loaded.
    pub enabled: bool,

    /// Model used when no mapping matches the corpus dimension.
    pub default_model: String,

    /// Directory for cached model files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<String>,

    /// Dimension → model table.
    pub models: Vec<ModelMapping>,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_model: "all-minilm-l6-v2".to_string(),
            cache_path: None,
            models: vec![
                ModelMapping::new(384, "all-minilm-l6-v2"),
                ModelMapping::new(768, "all-mpnet-base-v2"),
                ModelMapping::new(1024, "bge-large-en-v1.5"),
            ],
        }
    }
}

// ============================================================================
// Corpus
// ============================================================================

/// All stored vectors of one store, loaded for a single query.
///
/// Vectors are kept in one contiguous buffer in store order. Every vector
/// has exactly [`dimension`](Corpus::dimension) components.
#[derive(Debug, Clone)]
pub struct Corpus {
    ids: Vec<String>,
    data: Vec<f32>,
    dimension: usize,
}

impl Corpus {
    /// Create an empty corpus of the given dimension.
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(Error::corpus("vectors must have at least one component"));
        }
        Ok(Self {
            ids: Vec::new(),
            data: Vec::new(),
            dimension,
        })
    }

    /// Append a vector, enforcing the corpus dimension.
    pub fn push(&mut self, id: impl Into<String>, vector: &[f32]) -> Result<()> {
        let id = id.into();
        if vector.len() != self.dimension {
            return Err(Error::corpus(format!(
                "chunk '{id}' has {} components, expected {}",
                vector.len(),
                self.dimension
            )));
        }
        self.data.extend_from_slice(vector);
        self.ids.push(id);
        Ok(())
    }

    /// The corpus dimension D.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the corpus holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Chunk id at store position `index`.
    pub fn id(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    /// Iterate `(id, vector)` pairs in store order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.ids
            .iter()
            .map(String::as_str)
            .zip(self.data.chunks_exact(self.dimension))
    }
}

// ============================================================================
// Ranking and results
// ============================================================================

/// A chunk id with its similarity score. Only lives inside ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// Chunk identifier.
    pub id: String,
    /// Dot product with the query vector.
    pub score: f32,
}

/// A ranked chunk ready for output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    /// Chunk identifier.
    pub id: String,
    /// Similarity score.
    pub score: f32,
    /// Chunk text.
    pub text: String,
}

impl ResultEntry {
    /// Create a result entry.
    pub fn new(id: impl Into<String>, score: f32, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            score,
            text: text.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Config tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_remote_config_default() {
        let config = RemoteConfig::default();
        assert!(config.enabled);
        assert_eq!(config.model, "text-embedding-3-large");
        assert_eq!(config.native_dimension, 3072);
        assert_eq!(config.dimensions, vec![1536, 3072]);
        assert_eq!(config.api_key_env, "OPENAI_API_KEY");
        assert!(config.api_key.is_none());
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_remote_config_serialization_skips_secret() {
        let json = serde_json::to_string(&RemoteConfig::default()).unwrap();
        assert!(!json.contains("api_key\":"));
        assert!(json.contains("api_key_env"));
        assert!(!json.contains("timeout_secs"));
    }

    #[test]
    fn test_local_config_default_models() {
        let config = LocalConfig::default();
        assert_eq!(config.default_model, "all-minilm-l6-v2");
        assert_eq!(config.models.len(), 3);
        assert_eq!(config.models[0], ModelMapping::new(384, "all-minilm-l6-v2"));
        assert_eq!(config.models[1], ModelMapping::new(768, "all-mpnet-base-v2"));
    }

    #[test]
    fn test_local_config_partial_deserialization() {
        let json = r#"{"default_model": "bge-small-en-v1.5"}"#;
        let config: LocalConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.default_model, "bge-small-en-v1.5");
        assert!(config.enabled);
        assert_eq!(config.models.len(), 3);
    }

    // ------------------------------------------------------------------------
    // Corpus tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_corpus_push_and_iter() {
        let mut corpus = Corpus::new(2).unwrap();
        corpus.push("a", &[1.0, 0.0]).unwrap();
        corpus.push("b", &[0.0, 1.0]).unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.dimension(), 2);
        let pairs: Vec<_> = corpus.iter().collect();
        assert_eq!(pairs[0], ("a", &[1.0, 0.0][..]));
        assert_eq!(pairs[1], ("b", &[0.0, 1.0][..]));
        assert_eq!(corpus.id(1), Some("b"));
        assert_eq!(corpus.id(2), None);
    }

    #[test]
    fn test_corpus_rejects_wrong_length() {
        let mut corpus = Corpus::new(3).unwrap();
        let err = corpus.push("bad", &[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, Error::CorpusIntegrity(_)));
        assert!(err.to_string().contains("'bad'"));
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_corpus_rejects_zero_dimension() {
        assert!(matches!(
            Corpus::new(0).unwrap_err(),
            Error::CorpusIntegrity(_)
        ));
    }

    #[test]
    fn test_result_entry_new() {
        let entry = ResultEntry::new("c1", 0.5, "text");
        assert_eq!(entry.id, "c1");
        assert_eq!(entry.score, 0.5);
        assert_eq!(entry.text, "text");
    }
}
