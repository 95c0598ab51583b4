//! One query, end to end.
//!
//! Loads the corpus, picks a backend for the query, embeds it, checks the
//! query vector against the corpus dimension, ranks, and joins the winners
//! with their text. Nothing survives between calls.

use vxsearch_core::{Error, Result, VectorStore};

use crate::gateway::EmbeddingGateway;
use crate::ranker;
use crate::resolver::ProviderResolver;
use crate::store::load_corpus;
use crate::types::ResultEntry;

/// The retrieval pipeline.
#[derive(Debug, Clone)]
pub struct SearchPipeline {
    resolver: ProviderResolver,
    gateway: EmbeddingGateway,
}

impl SearchPipeline {
    /// Create a pipeline from a resolver and a gateway.
    pub fn new(resolver: ProviderResolver, gateway: EmbeddingGateway) -> Self {
        Self { resolver, gateway }
    }

    /// Return the `top_k` chunks of `store` most similar to `query`.
    ///
    /// `credential` is the remote API key, if any. Remote failures never
    /// surface here when a local model can take over.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidData`] if `top_k` is zero
    /// - [`Error::CorpusIntegrity`] if the store is empty or inconsistent
    /// - [`Error::NoEmbeddingBackendAvailable`] if no backend can serve the query
    /// - [`Error::EmbeddingUnavailable`] if every usable backend failed
    /// - [`Error::DimensionMismatch`] if the query vector does not match the corpus
    pub async fn search(
        &self,
        store: &dyn VectorStore,
        query: &str,
        top_k: usize,
        credential: Option<&str>,
    ) -> Result<Vec<ResultEntry>> {
        if top_k == 0 {
            return Err(Error::invalid_data("K must be at least 1"));
        }

        let corpus = load_corpus(store)?;
        let dimension = corpus.dimension();

        let selection = self
            .resolver
            .resolve(credential, dimension, self.gateway.availability())?;
        log::info!(
            "Embedding query with {} backend ({} chunks, dimension {dimension})",
            selection.label(),
            corpus.len()
        );

        let (vector, backend) = self
            .gateway
            .embed_query(&selection, query, credential, dimension)
            .await?;
        if vector.len() != dimension {
            return Err(Error::dimension_mismatch(dimension, vector.len(), backend));
        }

        let ranked = ranker::rank(&corpus, &vector, top_k)?;

        ranked
            .into_iter()
            .map(|candidate| {
                let chunk = store.get_chunk(&candidate.id)?;
                Ok(ResultEntry::new(candidate.id, candidate.score, chunk.text))
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::embedding::MockModelLoader;
    use crate::store::MemoryVectorStore;
    use crate::types::{LocalConfig, RemoteConfig};
    use std::sync::Arc;
    use vxsearch_core::Chunk;

    fn resolver() -> ProviderResolver {
        ProviderResolver::from_config(&RemoteConfig::default(), &LocalConfig::default())
    }

    fn store() -> MemoryVectorStore {
        MemoryVectorStore::new(vec![
            Chunk::new("a", vec![1.0, 0.0], "alpha"),
            Chunk::new("b", vec![0.0, 1.0], "beta"),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_joins_text() {
        let gateway = EmbeddingGateway::new()
            .with_local(Arc::new(MockModelLoader::fixed(vec![0.0, 1.0])));
        let pipeline = SearchPipeline::new(resolver(), gateway);

        let results = pipeline.search(&store(), "q", 1, None).await.unwrap();
        assert_eq!(results, vec![ResultEntry::new("b", 1.0, "beta")]);
    }

    #[tokio::test]
    async fn test_local_dimension_mismatch_names_backend() {
        let gateway = EmbeddingGateway::new().with_local(Arc::new(MockModelLoader::new(384)));
        let pipeline = SearchPipeline::new(resolver(), gateway);

        let err = pipeline.search(&store(), "q", 1, None).await.unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch { expected: 2, actual: 384, ref origin }
                if origin == "all-minilm-l6-v2"
        ));
    }

    #[tokio::test]
    async fn test_no_backend() {
        let pipeline = SearchPipeline::new(resolver(), EmbeddingGateway::new());
        let err = pipeline
            .search(&store(), "q", 1, Some("sk-test"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoEmbeddingBackendAvailable(_)));
    }

    #[tokio::test]
    async fn test_zero_k_fails_before_loading() {
        let pipeline = SearchPipeline::new(resolver(), EmbeddingGateway::new());
        let empty = MemoryVectorStore::new(vec![]).unwrap();
        let err = pipeline.search(&empty, "q", 0, None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_empty_store_is_integrity_error() {
        let gateway = EmbeddingGateway::new().with_local(Arc::new(MockModelLoader::new(2)));
        let pipeline = SearchPipeline::new(resolver(), gateway);
        let empty = MemoryVectorStore::new(vec![]).unwrap();
        let err = pipeline.search(&empty, "q", 4, None).await.unwrap_err();
        assert!(matches!(err, Error::CorpusIntegrity(_)));
    }
}
