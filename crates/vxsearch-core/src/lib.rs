//! vxsearch core: shared types, traits, and errors.
//!
//! This crate has no internal vxsearch dependencies. Everything the retrieval
//! pipeline needs to know about its collaborators lives here.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`chunk`]: The stored unit of text plus its embedding
//! - [`traits`]: Collaborator contracts (vector store, credential source)
//! - [`credentials`]: Config/env backed credential lookup

pub mod chunk;
pub mod credentials;
pub mod error;
pub mod traits;

// Re-export key types at crate root for convenience
pub use chunk::Chunk;
pub use credentials::ConfiguredCredentials;
pub use error::{Error, Result};
pub use traits::{CredentialSource, VectorStore};
