//! Client configuration for the Claude-backed extraction.

use std::path::PathBuf;
use std::time::Duration;

use crate::errors::CliError;

/// Environment variable holding the default model.
pub const MODEL_ENV_VAR: &str = "HOT_DEALS_MODEL";

/// Environment variable holding the default timeout in seconds.
pub const TIMEOUT_ENV_VAR: &str = "HOT_DEALS_TIMEOUT_SECS";

/// Environment variable holding the Anthropic API key passed to the CLI.
pub const API_KEY_ENV_VAR: &str = "ANTHROPIC_API_KEY";

/// Configuration for the Claude CLI backend.
///
/// Built from the environment (a `.env` file is loaded first), then
/// overridden by command-line flags.
#[derive(Clone, Default)]
pub struct ClientConfig {
    /// Override CLI binary location (None = auto-discover).
    pub binary_path: Option<PathBuf>,

    /// Maximum execution time for one extraction.
    ///
    /// Default: 300 seconds (5 minutes)
    pub timeout: Option<Duration>,

    /// Model requested from the CLI (None = the CLI's default).
    pub model: Option<String>,

    /// API key forwarded to the subprocess as `ANTHROPIC_API_KEY`.
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("binary_path", &self.binary_path)
            .field("timeout", &self.timeout)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ClientConfig {
    /// Default timeout for one extraction.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    /// Reads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` if the timeout variable is not a whole number.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let timeout = non_empty(TIMEOUT_ENV_VAR)
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| CliError::Config(format!("{TIMEOUT_ENV_VAR} must be whole seconds, got {raw:?}")))
            })
            .transpose()?;

        Ok(Self {
            binary_path: None,
            timeout,
            model: non_empty(MODEL_ENV_VAR),
            api_key: non_empty(API_KEY_ENV_VAR),
        })
    }

    /// Set the CLI binary location.
    #[must_use]
    pub fn with_binary_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.binary_path = path;
        }
        self
    }

    /// Set the model.
    #[must_use]
    pub fn with_model(mut self, model: Option<String>) -> Self {
        if model.is_some() {
            self.model = model;
        }
        self
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: Option<u64>) -> Self {
        if let Some(secs) = secs {
            self.timeout = Some(Duration::from_secs(secs));
        }
        self
    }

    /// The effective timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(Self::DEFAULT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.model.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_env_then_flags() {
        let config = ClientConfig::from_lookup(lookup(&[
            (MODEL_ENV_VAR, "sonnet"),
            (TIMEOUT_ENV_VAR, "60"),
            (API_KEY_ENV_VAR, "sk-test"),
        ]))
        .unwrap()
        .with_model(Some("opus".to_string()))
        .with_timeout_secs(None);

        assert_eq!(config.model.as_deref(), Some("opus"));
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(!format!("{config:?}").contains("sk-test"));
    }

    #[test]
    fn test_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[(TIMEOUT_ENV_VAR, "soon")])).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = ClientConfig::from_lookup(lookup(&[(MODEL_ENV_VAR, "  ")])).unwrap();
        assert!(config.model.is_none());
    }
}
