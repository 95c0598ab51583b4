//! Configuration for the vxsearch CLI.
//!
//! Provides the [`VxsearchConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `VXSEARCH_CONFIG` environment variable
//! 3. XDG default: `~/.config/vxsearch/config.toml`
//! 4. Built-in defaults

use confyg::{Confygery, env};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use vxsearch_core::{ConfiguredCredentials, Error, Result};
use vxsearch_vector::{DEFAULT_PREFIX, LocalConfig, RemoteConfig};

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "VXSEARCH_CONFIG";

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the vxsearch CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VxsearchConfig {
    /// Output rendering.
    pub output: OutputConfig,

    /// Remote embedding backend.
    pub remote: RemoteConfig,

    /// Local embedding models.
    pub local: LocalConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Tag printed before each chunk id.
    pub prefix: String,

    /// K when none is given on the command line.
    pub default_top_k: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            default_top_k: 4,
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl VxsearchConfig {
    /// Load configuration from file, environment, and defaults.
    ///
    /// A config path that does not exist is skipped; the remaining layers
    /// still apply.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("VXSEARCH");
        env_opts.add_section("output");
        env_opts.add_section("remote");
        env_opts.add_section("local");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("vxsearch").join("config.toml"))
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.output.default_top_k == 0 {
            return Err(Error::config("output.default_top_k must be at least 1"));
        }
        if self.remote.enabled && self.remote.endpoint.trim().is_empty() {
            return Err(Error::config("remote.endpoint must not be empty"));
        }
        if self.local.enabled && self.local.default_model.trim().is_empty() {
            return Err(Error::config("local.default_model must not be empty"));
        }
        Ok(())
    }

    /// Credential source for the remote backend.
    pub fn credentials(&self) -> ConfiguredCredentials {
        ConfiguredCredentials::new(
            self.remote.api_key.clone(),
            Some(self.remote.api_key_env.clone()),
        )
    }

    /// Serialize this config to TOML with any API key masked.
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.remote.api_key.is_some() {
            shown.remote.api_key = Some("<redacted>".to_string());
        }
        toml::to_string_pretty(&shown).map_err(|e| Error::config(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
