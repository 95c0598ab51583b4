//! The vxsearch application: logging, component wiring, one search.

use crate::cli::CliArgs;
use crate::config::VxsearchConfig;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vxsearch_core::{CredentialSource, Error, Result};
use vxsearch_vector::{
    EmbeddingGateway, JsonlVectorStore, OpenAiFactory, ProviderResolver, ResultFormatter,
    SearchPipeline,
};

// ============================================================================
// Logging
// ============================================================================

/// Initialise tracing-based logging on stderr.
///
/// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
/// Stdout carries only search results.
pub fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(default_filter(verbose, quiet))
    };

    // Ignore error if a subscriber is already set (e.g. in tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    }
}

// ============================================================================
// Wiring
// ============================================================================

/// Build the gateway from configuration.
///
/// The remote backend is wired in when `remote.enabled`; local models need
/// both `local.enabled` and the `local-embeddings` feature.
pub fn build_gateway(config: &VxsearchConfig) -> EmbeddingGateway {
    let mut gateway = EmbeddingGateway::new();

    if config.remote.enabled {
        gateway = gateway.with_remote(Arc::new(OpenAiFactory::new(config.remote.clone())));
    }

    with_local_models(gateway, config)
}

#[cfg(feature = "local-embeddings")]
fn with_local_models(gateway: EmbeddingGateway, config: &VxsearchConfig) -> EmbeddingGateway {
    if !config.local.enabled {
        return gateway;
    }
    gateway.with_local(Arc::new(vxsearch_vector::FastEmbedLoader::new(
        config.local.cache_path.clone(),
    )))
}

#[cfg(not(feature = "local-embeddings"))]
fn with_local_models(gateway: EmbeddingGateway, config: &VxsearchConfig) -> EmbeddingGateway {
    if config.local.enabled {
        tracing::debug!("Local embeddings not compiled in (feature `local-embeddings`)");
    }
    gateway
}

/// Build the retrieval pipeline from configuration.
pub fn build_pipeline(config: &VxsearchConfig) -> SearchPipeline {
    SearchPipeline::new(
        ProviderResolver::from_config(&config.remote, &config.local),
        build_gateway(config),
    )
}

// ============================================================================
// Run
// ============================================================================

/// Run one search and return the formatted output.
pub async fn run(args: &CliArgs, config: &VxsearchConfig) -> Result<String> {
    let top_k = match args.top_k {
        Some(k) => {
            usize::try_from(k).map_err(|_| Error::invalid_data(format!("K too large: {k}")))?
        }
        None => config.output.default_top_k,
    };
    let prefix = args.prefix.as_deref().unwrap_or(&config.output.prefix);

    if let Ok(effective) = config.to_redacted_toml() {
        tracing::debug!("Effective configuration:\n{effective}");
    }

    let store = JsonlVectorStore::open(&args.store)?;
    let api_key = config.credentials().api_key();
    let pipeline = build_pipeline(config);

    let results = pipeline
        .search(&store, &args.query, top_k, api_key.as_deref())
        .await?;
    tracing::debug!("Returning {} results", results.len());

    Ok(ResultFormatter::new(prefix).format_results(&results))
}

// ============================================================================
// Tests
// ============================================================================
