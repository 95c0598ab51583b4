//! OpenAI-compatible remote embedding backend.
//!
//! Posts `{model, input, dimensions?}` to an embeddings endpoint with a
//! bearer token and returns the vectors in input order. Any transport,
//! status, or decoding problem becomes an [`Error::Embedding`]; the gateway
//! decides what to do with it.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use vxsearch_core::{Error, Result};

use crate::embedding::{EmbeddingBackend, RemoteBackendFactory};
use crate::types::RemoteConfig;

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// Embedding backend calling an OpenAI-compatible `/v1/embeddings` endpoint.
pub struct OpenAiBackend {
    api_key: String,
    model: String,
    endpoint: String,
    dimension: usize,
    send_dimensions: bool,
    client: reqwest::Client,
}

impl OpenAiBackend {
    /// Creates a new OpenAI backend.
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key sent as a bearer token
    /// * `model` - Model ID (e.g., "text-embedding-3-large")
    /// * `dimension` - Vector length the caller expects back
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            endpoint: RemoteConfig::default().endpoint,
            dimension,
            send_dimensions: false,
            client: reqwest::Client::new(),
        }
    }

    /// Use a different embeddings endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Ask the API to shorten its output to `dimension` components.
    pub fn with_dimensions_param(mut self, enabled: bool) -> Self {
        self.send_dimensions = enabled;
        self
    }

    fn request_body(&self, texts: &[&str]) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });
        if self.send_dimensions {
            body["dimensions"] = serde_json::json!(self.dimension);
        }
        body
    }
}

/// Reorder response items by `index` and check that every input got one.
fn into_vectors(mut data: Vec<EmbeddingData>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(Error::embedding(format!(
            "Embeddings API returned {} vectors for {expected} inputs",
            data.len()
        )));
    }

    data.sort_by_key(|d| d.index);
    if data.iter().enumerate().any(|(i, d)| d.index != i) {
        return Err(Error::embedding("Embeddings API returned non-contiguous indices"));
    }

    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[async_trait]
impl EmbeddingBackend for OpenAiBackend {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::embedding("No embedding returned"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(texts))
            .send()
            .await
            .map_err(|e| Error::embedding_with_source("Failed to call embeddings API", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::embedding(format!(
                "Embeddings API error {status}: {error_text}"
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding_with_source("Failed to parse embeddings response", e))?;

        into_vectors(body.data, texts.len())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for OpenAiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiBackend")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("dimension", &self.dimension)
            .finish()
    }
}

/// Builds [`OpenAiBackend`]s from a [`RemoteConfig`].
#[derive(Debug, Clone)]
pub struct OpenAiFactory {
    config: RemoteConfig,
}

impl OpenAiFactory {
    /// Create a factory for the given remote settings.
    pub fn new(config: RemoteConfig) -> Self {
        Self { config }
    }
}

impl RemoteBackendFactory for OpenAiFactory {
    fn create(&self, api_key: &str, dimension: usize) -> Result<Arc<dyn EmbeddingBackend>> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::config(format!("HTTP client: {e}")))?;

        let backend = OpenAiBackend::new(api_key, &self.config.model, dimension)
            .with_endpoint(&self.config.endpoint)
            .with_client(client)
            .with_dimensions_param(dimension < self.config.native_dimension);

        log::debug!("Remote backend ready: {backend:?}");
        Ok(Arc::new(backend))
    }
}

// ============================================================================
// Tests
// ============================================================================
