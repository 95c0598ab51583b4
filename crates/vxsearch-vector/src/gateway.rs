//! Embedding gateway with remote-then-local fallback.
//!
//! The gateway turns a [`BackendSelection`] into vectors. A remote attempt is
//! a single call; if it errors or returns vectors of the wrong shape, the
//! failure is logged at debug level and the local model is tried instead.
//! Only when no local path remains does the caller see an error.

use std::sync::Arc;
use vxsearch_core::{Error, Result};

use crate::embedding::{EmbeddingBackend, LocalModelLoader, RemoteBackendFactory};
use crate::resolver::{Availability, BackendSelection};

/// Vectors produced for a batch of texts, and the backend that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Embeddings {
    /// One vector per input text, in input order.
    pub vectors: Vec<Vec<f32>>,
    /// Name of the backend that produced `vectors`.
    pub backend: String,
}

/// Calls the selected embedding backend, falling back to a local model.
#[derive(Default, Clone)]
pub struct EmbeddingGateway {
    remote: Option<Arc<dyn RemoteBackendFactory>>,
    local: Option<Arc<dyn LocalModelLoader>>,
}

impl EmbeddingGateway {
    /// A gateway with no backends.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the remote backend.
    pub fn with_remote(mut self, factory: Arc<dyn RemoteBackendFactory>) -> Self {
        self.remote = Some(factory);
        self
    }

    /// Enable local models.
    pub fn with_local(mut self, loader: Arc<dyn LocalModelLoader>) -> Self {
        self.local = Some(loader);
        self
    }

    /// Which backends this gateway can reach.
    pub fn availability(&self) -> Availability {
        Availability {
            remote: self.remote.is_some(),
            local: self.local.is_some(),
        }
    }

    /// Embed `texts` with the selected backend.
    ///
    /// Remote output is only accepted if it has one vector per text and every
    /// vector has `dimension` components. Local output is returned as is; the
    /// caller checks it against the corpus.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmbeddingUnavailable`] if the local model cannot be
    /// used after the remote attempt failed or was never selected.
    pub async fn embed(
        &self,
        selection: &BackendSelection,
        texts: &[&str],
        credential: Option<&str>,
        dimension: usize,
    ) -> Result<Embeddings> {
        match selection {
            BackendSelection::Remote { fallback_model } => {
                let remote_err = match self.embed_remote(texts, credential, dimension).await {
                    Ok(embeddings) => return Ok(embeddings),
                    Err(e) => e,
                };
                match fallback_model {
                    Some(model) => {
                        log::debug!(
                            "Remote embedding failed, using local model {model}: {remote_err}"
                        );
                        self.embed_local(model, texts).await
                    }
                    None => Err(Error::unavailable(format!(
                        "remote embedding failed and no local model is available ({remote_err})"
                    ))),
                }
            }
            BackendSelection::Local { model } => self.embed_local(model, texts).await,
        }
    }

    /// Embed a single query string.
    pub async fn embed_query(
        &self,
        selection: &BackendSelection,
        query: &str,
        credential: Option<&str>,
        dimension: usize,
    ) -> Result<(Vec<f32>, String)> {
        let Embeddings { vectors, backend } =
            self.embed(selection, &[query], credential, dimension).await?;
        let vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| Error::unavailable(format!("{backend} returned no vector")))?;
        Ok((vector, backend))
    }

    async fn embed_remote(
        &self,
        texts: &[&str],
        credential: Option<&str>,
        dimension: usize,
    ) -> Result<Embeddings> {
        let factory = self
            .remote
            .as_ref()
            .ok_or_else(|| Error::embedding("remote backend is not configured"))?;
        let api_key = credential
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::embedding("no API key"))?;

        let backend = factory.create(api_key, dimension)?;
        let vectors = backend.embed_batch(texts).await?;
        check_shape(backend.as_ref(), &vectors, texts.len(), dimension)?;

        Ok(Embeddings {
            vectors,
            backend: backend.name().to_string(),
        })
    }

    async fn embed_local(&self, model: &str, texts: &[&str]) -> Result<Embeddings> {
        let loader = self
            .local
            .as_ref()
            .ok_or_else(|| Error::unavailable("no local model loader is configured"))?;

        let backend = loader
            .load(model)
            .await
            .map_err(|e| {
                Error::unavailable(format!("local model {model} could not be loaded: {e}"))
            })?;
        let vectors = backend
            .embed_batch(texts)
            .await
            .map_err(|e| Error::unavailable(format!("local model {model} failed: {e}")))?;

        if vectors.len() != texts.len() {
            return Err(Error::unavailable(format!(
                "local model {model} returned {} vectors for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }

        Ok(Embeddings {
            vectors,
            backend: backend.name().to_string(),
        })
    }
}

fn check_shape(
    backend: &dyn EmbeddingBackend,
    vectors: &[Vec<f32>],
    expected_count: usize,
    dimension: usize,
) -> Result<()> {
    if vectors.len() != expected_count {
        return Err(Error::embedding(format!(
            "{} returned {} vectors for {expected_count} inputs",
            backend.name(),
            vectors.len()
        )));
    }
    match vectors.iter().find(|v| v.len() != dimension) {
        Some(v) => Err(Error::dimension_mismatch(dimension, v.len(), backend.name())),
        None => Ok(()),
    }
}

impl std::fmt::Debug for EmbeddingGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingGateway")
            .field("availability", &self.availability())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::embedding::{
        FailingBackend, MockEmbeddingBackend, MockModelLoader, MockRemoteFactory,
    };
    use async_trait::async_trait;

    fn remote(fallback: Option<&str>) -> BackendSelection {
        BackendSelection::Remote {
            fallback_model: fallback.map(String::from),
        }
    }

    fn local(model: &str) -> BackendSelection {
        BackendSelection::Local {
            model: model.to_string(),
        }
    }

    struct BrokenLoader;

    #[async_trait]
    impl LocalModelLoader for BrokenLoader {
        async fn load(&self, model: &str) -> Result<Arc<dyn EmbeddingBackend>> {
            Err(Error::config(format!("Unknown embedding model: '{model}'")))
        }
    }

    #[test]
    fn test_availability() {
        assert_eq!(EmbeddingGateway::new().availability(), Availability::default());

        let gateway = EmbeddingGateway::new().with_local(Arc::new(MockModelLoader::new(3)));
        assert_eq!(
            gateway.availability(),
            Availability {
                remote: false,
                local: true
            }
        );
    }

    #[tokio::test]
    async fn test_remote_success() {
        let backend = MockEmbeddingBackend::fixed(vec![1.0, 0.0, 0.0]).with_name("remote-mock");
        let loader = Arc::new(MockModelLoader::new(3));
        let gateway = EmbeddingGateway::new()
            .with_remote(Arc::new(MockRemoteFactory::new(Arc::new(backend))))
            .with_local(loader.clone());

        let out = gateway
            .embed(&remote(Some("local-model")), &["q"], Some("sk-test"), 3)
            .await
            .unwrap();
        assert_eq!(out.vectors, vec![vec![1.0, 0.0, 0.0]]);
        assert_eq!(out.backend, "remote-mock");
        assert!(loader.loaded().is_empty());
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_silently() {
        let loader = Arc::new(MockModelLoader::fixed(vec![0.0, 1.0, 0.0]));
        let gateway = EmbeddingGateway::new()
            .with_remote(Arc::new(MockRemoteFactory::new(Arc::new(FailingBackend::new(
                3,
                "401 Unauthorized",
            )))))
            .with_local(loader.clone());

        let out = gateway
            .embed(&remote(Some("all-minilm-l6-v2")), &["q"], Some("sk-test"), 3)
            .await
            .unwrap();
        assert_eq!(out.vectors, vec![vec![0.0, 1.0, 0.0]]);
        assert_eq!(out.backend, "all-minilm-l6-v2");
        assert_eq!(loader.loaded(), vec!["all-minilm-l6-v2"]);
    }

    #[tokio::test]
    async fn test_remote_wrong_dimension_falls_back() {
        let loader = Arc::new(MockModelLoader::new(3));
        let gateway = EmbeddingGateway::new()
            .with_remote(Arc::new(MockRemoteFactory::new(Arc::new(
                MockEmbeddingBackend::new(5),
            ))))
            .with_local(loader.clone());

        let out = gateway
            .embed(&remote(Some("local-model")), &["q"], Some("sk-test"), 3)
            .await
            .unwrap();
        assert_eq!(out.vectors[0].len(), 3);
        assert_eq!(loader.loaded(), vec!["local-model"]);
    }

    #[tokio::test]
    async fn test_remote_failure_without_local_is_unavailable() {
        let gateway = EmbeddingGateway::new().with_remote(Arc::new(MockRemoteFactory::new(
            Arc::new(FailingBackend::new(3, "timeout")),
        )));

        let err = gateway
            .embed(&remote(None), &["q"], Some("sk-test"), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmbeddingUnavailable(_)));
        assert!(err.to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn test_local_load_failure_is_unavailable() {
        let gateway = EmbeddingGateway::new().with_local(Arc::new(BrokenLoader));
        let err = gateway
            .embed(&local("missing"), &["q"], None, 3)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmbeddingUnavailable(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn test_local_without_loader_is_unavailable() {
        let err = EmbeddingGateway::new()
            .embed(&local("all-minilm-l6-v2"), &["q"], None, 3)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmbeddingUnavailable(_)));
    }

    #[tokio::test]
    async fn test_local_output_returned_unchecked() {
        // Dimension checks against the corpus happen in the pipeline.
        let gateway = EmbeddingGateway::new().with_local(Arc::new(MockModelLoader::new(4)));
        let (vector, backend) = gateway
            .embed_query(&local("wide"), "q", None, 3)
            .await
            .unwrap();
        assert_eq!(vector.len(), 4);
        assert_eq!(backend, "wide");
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let gateway = EmbeddingGateway::new().with_local(Arc::new(MockModelLoader::new(8)));
        let out = gateway
            .embed(&local("m"), &["first", "second"], None, 8)
            .await
            .unwrap();

        let direct = MockEmbeddingBackend::new(8);
        assert_eq!(out.vectors[0], direct.embed("first").await.unwrap());
        assert_eq!(out.vectors[1], direct.embed("second").await.unwrap());
    }
}
