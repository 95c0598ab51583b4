//! Embedding backend selection.
//!
//! Decides, per query, whether the remote API or a local model embeds the
//! query text. Selection is pure: nothing is loaded or called here.
//!
//! # Policy
//!
//! First match wins:
//!
//! 1. Credential present, remote client available, and the corpus dimension
//!    is one the remote model can produce → remote
//! 2. Local model available → local, using the model mapped to the corpus
//!    dimension or the default model
//! 3. Otherwise → [`Error::NoEmbeddingBackendAvailable`]

use vxsearch_core::{Error, Result};

use crate::types::{LocalConfig, ModelMapping, RemoteConfig};

/// Which backends could be used at all in this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Availability {
    /// A remote client can be constructed.
    pub remote: bool,
    /// A local model loader is present.
    pub local: bool,
}

/// The resolver's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSelection {
    /// Embed remotely; fall back to `fallback_model` locally if that fails.
    Remote {
        /// Local model to try if the remote call fails. `None` when no local
        /// backend is available.
        fallback_model: Option<String>,
    },
    /// Embed with a local model.
    Local {
        /// Local model name.
        model: String,
    },
}

impl BackendSelection {
    /// Short label for logs.
    pub fn label(&self) -> &str {
        match self {
            Self::Remote { .. } => "remote",
            Self::Local { .. } => "local",
        }
    }
}

/// Dimension → local model table with a default.
#[derive(Debug, Clone)]
pub struct LocalModelMap {
    default_model: String,
    models: Vec<ModelMapping>,
}

impl LocalModelMap {
    /// Create a table.
    pub fn new(default_model: impl Into<String>, models: Vec<ModelMapping>) -> Self {
        Self {
            default_model: default_model.into(),
            models,
        }
    }

    /// Model whose native dimension is `dimension`, else the default.
    ///
    /// The default model's dimension may differ from `dimension`; the
    /// pipeline rejects such output before ranking.
    pub fn model_for(&self, dimension: usize) -> &str {
        self.models
            .iter()
            .find(|m| m.dimension == dimension)
            .map_or(self.default_model.as_str(), |m| m.model.as_str())
    }
}

impl From<&LocalConfig> for LocalModelMap {
    fn from(config: &LocalConfig) -> Self {
        Self::new(config.default_model.clone(), config.models.clone())
    }
}

/// Chooses the embedding backend for a query.
#[derive(Debug, Clone)]
pub struct ProviderResolver {
    remote_dimensions: Vec<usize>,
    local_models: LocalModelMap,
}

impl ProviderResolver {
    /// Create a resolver.
    ///
    /// # Arguments
    ///
    /// * `remote_dimensions` - Corpus dimensions the remote model can produce
    /// * `local_models` - Dimension → local model table
    pub fn new(remote_dimensions: Vec<usize>, local_models: LocalModelMap) -> Self {
        Self {
            remote_dimensions,
            local_models,
        }
    }

    /// Build a resolver from backend configuration.
    pub fn from_config(remote: &RemoteConfig, local: &LocalConfig) -> Self {
        Self::new(remote.dimensions.clone(), LocalModelMap::from(local))
    }

    /// Select a backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoEmbeddingBackendAvailable`] if neither rule 1 nor
    /// rule 2 applies.
    pub fn resolve(
        &self,
        credential: Option<&str>,
        dimension: usize,
        availability: Availability,
    ) -> Result<BackendSelection> {
        if dimension == 0 {
            return Err(Error::invalid_data("corpus dimension must be positive"));
        }

        let has_credential = credential.is_some_and(|k| !k.trim().is_empty());
        let local_model = || self.local_models.model_for(dimension).to_string();

        if has_credential && availability.remote && self.remote_dimensions.contains(&dimension) {
            let fallback_model = availability.local.then(local_model);
            log::debug!("Selected remote backend for dimension {dimension}");
            return Ok(BackendSelection::Remote { fallback_model });
        }

        if availability.local {
            let model = local_model();
            log::debug!("Selected local model {model} for dimension {dimension}");
            return Ok(BackendSelection::Local { model });
        }

        let reason = match (has_credential, availability.remote) {
            (false, _) => "no API key is configured and no local model is available".to_string(),
            (true, false) => {
                "the remote client is disabled and no local model is available".to_string()
            }
            (true, true) => format!(
                "the remote model does not produce {dimension}-dimensional vectors and no local model is available"
            ),
        };
        Err(Error::no_backend(reason))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BOTH: Availability = Availability {
        remote: true,
        local: true,
    };
    const REMOTE_ONLY: Availability = Availability {
        remote: true,
        local: false,
    };
    const LOCAL_ONLY: Availability = Availability {
        remote: false,
        local: true,
    };
    const NONE: Availability = Availability {
        remote: false,
        local: false,
    };

    fn resolver() -> ProviderResolver {
        ProviderResolver::from_config(&RemoteConfig::default(), &LocalConfig::default())
    }

    #[test]
    fn test_credential_and_remote_dimension_selects_remote() {
        let selection = resolver().resolve(Some("sk-test"), 3072, BOTH).unwrap();
        assert_eq!(
            selection,
            BackendSelection::Remote {
                fallback_model: Some("all-minilm-l6-v2".to_string())
            }
        );
        assert_eq!(selection.label(), "remote");
    }

    #[test]
    fn test_remote_without_local_has_no_fallback() {
        let selection = resolver()
            .resolve(Some("sk-test"), 1536, REMOTE_ONLY)
            .unwrap();
        assert_eq!(
            selection,
            BackendSelection::Remote {
                fallback_model: None
            }
        );
    }

    #[test]
    fn test_no_credential_selects_local() {
        let selection = resolver().resolve(None, 3072, BOTH).unwrap();
        assert_eq!(
            selection,
            BackendSelection::Local {
                model: "all-minilm-l6-v2".to_string()
            }
        );
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let selection = resolver().resolve(Some("  "), 3072, BOTH).unwrap();
        assert_eq!(selection.label(), "local");
    }

    #[test]
    fn test_credential_with_local_dimension_selects_mapped_model() {
        let selection = resolver().resolve(Some("sk-test"), 768, BOTH).unwrap();
        assert_eq!(
            selection,
            BackendSelection::Local {
                model: "all-mpnet-base-v2".to_string()
            }
        );
    }

    #[test]
    fn test_local_768_uses_mpnet() {
        let selection = resolver().resolve(None, 768, LOCAL_ONLY).unwrap();
        assert_eq!(
            selection,
            BackendSelection::Local {
                model: "all-mpnet-base-v2".to_string()
            }
        );
    }

    #[test]
    fn test_remote_disabled_selects_local() {
        let selection = resolver()
            .resolve(Some("sk-test"), 3072, LOCAL_ONLY)
            .unwrap();
        assert_eq!(selection.label(), "local");
    }

    #[test]
    fn test_neither_backend_fails() {
        let err = resolver().resolve(Some("sk-test"), 3072, NONE).unwrap_err();
        assert!(matches!(err, Error::NoEmbeddingBackendAvailable(_)));

        let err = resolver().resolve(None, 384, NONE).unwrap_err();
        assert!(err.to_string().contains("no API key"));
    }

    #[test]
    fn test_remote_cannot_serve_dimension_without_local() {
        let err = resolver()
            .resolve(Some("sk-test"), 384, REMOTE_ONLY)
            .unwrap_err();
        assert!(matches!(err, Error::NoEmbeddingBackendAvailable(_)));
        assert!(err.to_string().contains("384-dimensional"));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(resolver().resolve(None, 0, BOTH).is_err());
    }

    #[test]
    fn test_model_map_lookup_and_default() {
        let map = LocalModelMap::new("fallback", vec![ModelMapping::new(384, "small")]);
        assert_eq!(map.model_for(384), "small");
        assert_eq!(map.model_for(999), "fallback");
    }
}
