//! Embedding-and-ranking pipeline for vxsearch.
//!
//! Given a store of precomputed chunk embeddings and a query string, this
//! crate embeds the query with a remote or local model and returns the K
//! most similar chunks.
//!
//! # Features
//!
//! - `local-embeddings`: Enable local embedding generation via fastembed
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     vxsearch-vector                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  VectorStore (vxsearch-core)                                │
//! │  ├── JsonlVectorStore (one chunk per line)                  │
//! │  └── MemoryVectorStore (tests, embedding callers)           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ProviderResolver (credential + dimension → backend)        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  EmbeddingGateway (remote, then local fallback)             │
//! │  ├── OpenAiBackend via RemoteBackendFactory                 │
//! │  └── FastEmbedBackend via LocalModelLoader (feature)        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Ranker (dot product, deterministic top-K)                  │
//! │  ResultFormatter (`EU:<id> (score s): text`)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use vxsearch_vector::{
//!     EmbeddingGateway, JsonlVectorStore, LocalConfig, OpenAiFactory,
//!     ProviderResolver, RemoteConfig, ResultFormatter, SearchPipeline,
//! };
//! use std::sync::Arc;
//!
//! let remote = RemoteConfig::default();
//! let local = LocalConfig::default();
//! let gateway = EmbeddingGateway::new()
//!     .with_remote(Arc::new(OpenAiFactory::new(remote.clone())));
//! let pipeline = SearchPipeline::new(ProviderResolver::from_config(&remote, &local), gateway);
//!
//! let store = JsonlVectorStore::open("chunks.jsonl")?;
//! let results = pipeline.search(&store, "how are chunks ranked?", 4, Some(&api_key)).await?;
//! println!("{}", ResultFormatter::default().format_results(&results));
//! ```

// Core modules
pub mod embedding;
pub mod store;
pub mod types;

// Retrieval stages
pub mod format;
pub mod gateway;
pub mod pipeline;
pub mod ranker;
pub mod resolver;

// Backends
pub mod openai;

#[cfg(feature = "local-embeddings")]
pub mod fastembed;

// Re-exports: core types
pub use types::{Corpus, LocalConfig, ModelMapping, RemoteConfig, ResultEntry, ScoredCandidate};

// Re-exports: embedding
pub use embedding::{
    EmbeddingBackend, FailingBackend, LocalModelLoader, MockEmbeddingBackend, MockModelLoader,
    MockRemoteFactory, RemoteBackendFactory,
};

// Re-exports: stages
pub use format::{DEFAULT_PREFIX, ENTRY_SEPARATOR, ResultFormatter};
pub use gateway::{EmbeddingGateway, Embeddings};
pub use pipeline::SearchPipeline;
pub use ranker::{dot_product, rank};
pub use resolver::{Availability, BackendSelection, LocalModelMap, ProviderResolver};
pub use store::{JsonlVectorStore, MemoryVectorStore, load_corpus};

// Re-exports: backends
pub use openai::{OpenAiBackend, OpenAiFactory};

#[cfg(feature = "local-embeddings")]
pub use crate::fastembed::{FastEmbedBackend, FastEmbedLoader};
