//! Tiebreak oracle configuration (endpoint, sampling, API key env var)

use std::env;
use std::path::{Path, PathBuf};

use rpa_match_logic::{CompletionParams, TiebreakRequest, DEFAULT_ENDPOINT};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_KEY_ENV: &str = "RPA_ORACLE_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid oracle config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Streaming chat-completion endpoint
    pub endpoint: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    #[serde(flatten)]
    pub params: CompletionParams,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            params: CompletionParams::default(),
        }
    }
}

impl OracleConfig {
    /// Parse TOML; keys left out keep their defaults
    ///
    /// ```toml
    /// endpoint = "https://api.deepseek.com/chat/completions"
    /// model = "deepseek-chat"
    /// temperature = 0.6
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// API key from the configured env var; unset or empty gives `None`
    pub fn api_key(&self) -> Option<String> {
        env::var(&self.api_key_env).ok().filter(|key| !key.is_empty())
    }

    /// Build the tiebreak request for two display names
    pub fn request(&self, name_a: &str, name_b: &str) -> TiebreakRequest {
        TiebreakRequest::with_params(name_a, name_b, self.params.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service() {
        let config = OracleConfig::default();
        assert_eq!(config.endpoint, "https://api.deepseek.com/chat/completions");
        assert_eq!(config.params.model, "deepseek-chat");
        assert_eq!(config.params.max_tokens, 2048);
        assert_eq!(config.api_key_env, DEFAULT_API_KEY_ENV);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = OracleConfig::from_toml_str(
            r#"
            model = "deepseek-reasoner"
            temperature = 1.0
            api_key_env = "MY_KEY"
            "#,
        )
        .unwrap();

        assert_eq!(config.params.model, "deepseek-reasoner");
        assert_eq!(config.params.temperature, 1.0);
        assert_eq!(config.params.max_tokens, 2048);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api_key_env, "MY_KEY");
    }

    #[test]
    fn test_invalid_toml() {
        let err = OracleConfig::from_toml_str("max_tokens = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = OracleConfig::from_path("/nonexistent/oracle.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_api_key_from_env() {
        let config = OracleConfig {
            api_key_env: "RPA_TEST_ORACLE_KEY_UNSET".to_string(),
            ..OracleConfig::default()
        };
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_request_uses_params() {
        let mut config = OracleConfig::default();
        config.params.max_tokens = 64;
        let request = config.request("Rock", "Lava");

        assert_eq!(request.prompt(), "Rock vs Lava");
        assert_eq!(request.body()["max_tokens"], 64);
    }
}
