//! Client configuration for reaching the notes backend.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::normalize_base_url;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid client configuration: {0}")]
    InvalidConfiguration(&'static str),
}

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawClientConfig")]
pub struct ClientConfig {
    api_base_url: String,
    timeout_secs: u64,
}

/// Unvalidated shape read from config files.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClientConfig {
    api_base_url: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

impl TryFrom<RawClientConfig> for ClientConfig {
    type Error = ConfigError;

    fn try_from(raw: RawClientConfig) -> Result<Self, Self::Error> {
        Self::new(raw.api_base_url)?.with_timeout_secs(raw.timeout_secs)
    }
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    pub fn new(api_base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
        let api_base_url = normalize_base_url(api_base_url.as_ref())
            .map_err(ConfigError::InvalidConfiguration)?;
        Ok(Self {
            api_base_url,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Overrides the per-request timeout. Zero is rejected.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Result<Self, ConfigError> {
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "Request timeout must be at least one second",
            ));
        }
        self.timeout_secs = timeout_secs;
        Ok(self)
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Joins an absolute API path (`/api/...`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_base_url() {
        let config = ClientConfig::new("http://localhost:8000/").unwrap();
        assert_eq!(config.api_base_url(), "http://localhost:8000");
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn endpoint_joins_paths_without_double_slashes() {
        let config = ClientConfig::new("https://notes.example.com").unwrap();
        assert_eq!(
            config.endpoint("/api/notes/"),
            "https://notes.example.com/api/notes/"
        );
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = ClientConfig::new("https://notes.example.com").unwrap();
        assert!(config.with_timeout_secs(0).is_err());
    }

    #[test]
    fn deserialize_rejects_unknown_fields() {
        let error = serde_json::from_str::<ClientConfig>(
            r#"{"api_base_url":"https://notes.example.com","retries":3}"#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("unknown field"));
    }

    #[test]
    fn deserialize_runs_the_same_validation_as_new() {
        let config = serde_json::from_str::<ClientConfig>(
            r#"{"api_base_url":" https://notes.example.com/ "}"#,
        )
        .unwrap();
        assert_eq!(config, ClientConfig::new("https://notes.example.com").unwrap());

        let bad_url =
            serde_json::from_str::<ClientConfig>(r#"{"api_base_url":"notes.example.com"}"#);
        assert!(bad_url.unwrap_err().to_string().contains("http://"));

        let zero_timeout = serde_json::from_str::<ClientConfig>(
            r#"{"api_base_url":"https://notes.example.com","timeout_secs":0}"#,
        );
        assert!(zero_timeout.is_err());
    }
}
