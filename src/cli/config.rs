// Dashboard Configuration Module
// Handles configuration from files; CLI flags are layered on top in main.

use crate::dashboard::DEFAULT_REFRESH_INTERVAL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reject values the poller cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.server.url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "server url must start with http:// or https://, got {:?}",
                url
            )));
        }
        if self.polling.refresh_ms == 0 {
            return Err(ConfigError::Validation(
                "refresh_ms must be greater than zero".to_string(),
            ));
        }
        if self.polling.record_limit == Some(0) {
            return Err(ConfigError::Validation(
                "record_limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.polling.refresh_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.polling.request_timeout_ms.map(Duration::from_millis)
    }

    /// Preference file location, falling back to the user config dir
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage
            .path
            .clone()
            .or_else(crate::preference::FileStore::default_path)
    }
}

/// Stats service location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_url")]
    pub url: String,
}

fn default_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

/// Refresh scheduling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Pause between refresh cycles (ms)
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
    /// Per-request timeout (ms); null disables it
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: Option<u64>,
    /// Maximum number of Globals/HOFs requested from the service
    #[serde(default)]
    pub record_limit: Option<usize>,
}

fn default_refresh_ms() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_millis() as u64
}

fn default_request_timeout_ms() -> Option<u64> {
    Some(30000)
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            refresh_ms: default_refresh_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            record_limit: None,
        }
    }
}

/// Preference storage
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// JSON file holding the dark-mode preference
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(String),
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.url, "http://127.0.0.1:8080");
        assert_eq!(config.polling.refresh_ms, 30000);
        assert_eq!(config.polling.request_timeout_ms, Some(30000));
        assert_eq!(config.polling.record_limit, None);
        assert!(config.storage.path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
server:
  url: "http://clams.local:9000"

polling:
  refresh_ms: 5000
  record_limit: 25

storage:
  path: "/tmp/clams/storage.json"
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.server.url, "http://clams.local:9000");
        assert_eq!(config.refresh_interval(), Duration::from_secs(5));
        assert_eq!(config.polling.record_limit, Some(25));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            config.storage_path(),
            Some(PathBuf::from("/tmp/clams/storage.json"))
        );
    }

    #[test]
    fn test_null_timeout_disables_it() {
        let yaml = r#"
polling:
  request_timeout_ms: null
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.polling.refresh_ms, 30000);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.polling.refresh_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = Config::default();
        config.polling.record_limit = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = Config::default();
        config.server.url = "clams.local:8080".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = Config::from_yaml("polling: [not, a, map]");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("/definitely/not/here.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
