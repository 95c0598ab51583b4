//! Credential lookup from configuration and the environment.

use crate::traits::CredentialSource;

/// Default environment variable holding the remote API key.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Looks up the API key from an explicit value first, then an env var.
///
/// Empty or whitespace-only values count as absent.
#[derive(Clone, Default)]
pub struct ConfiguredCredentials {
    explicit: Option<String>,
    env_var: Option<String>,
}

impl ConfiguredCredentials {
    /// Create a credential source.
    ///
    /// # Arguments
    ///
    /// * `explicit` - Key taken from the config file, if any
    /// * `env_var` - Name of the environment variable to consult next
    pub fn new(explicit: Option<String>, env_var: Option<String>) -> Self {
        Self { explicit, env_var }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl CredentialSource for ConfiguredCredentials {
    fn api_key(&self) -> Option<String> {
        if let Some(key) = non_empty(self.explicit.clone()) {
            log::debug!("Using API key from configuration");
            return Some(key);
        }

        let var = self.env_var.as_deref()?;
        let key = non_empty(std::env::var(var).ok());
        if key.is_some() {
            log::debug!("Using API key from ${var}");
        }
        key
    }
}

impl std::fmt::Debug for ConfiguredCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredCredentials")
            .field("explicit", &self.explicit.as_ref().map(|_| "<redacted>"))
            .field("env_var", &self.env_var)
            .finish()
    }
}
