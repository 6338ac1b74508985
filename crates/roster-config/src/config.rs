use roster_types::{PageSize, DEFAULT_API_URL};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::paths::get_config_path;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid api.base_url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Seconds. Requests never time out when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default)]
    pub page_size: PageSize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&get_config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&content)?;
        config.base_url()?;
        Ok(config)
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        parse_base_url(&self.api.base_url)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.api.request_timeout.map(Duration::from_secs)
    }
}

pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), content).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:4040");
        assert_eq!(config.table.page_size, PageSize::default());
        assert_eq!(config.log.level, "info");
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_partial_file() {
        let file = write_config("[api]\nbase_url = \"http://users.internal:8080\"\nrequest_timeout = 10\n");
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.base_url().unwrap().host_str(), Some("users.internal"));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.table.page_size.get(), 5);
    }

    #[test]
    fn test_page_size_must_be_an_option() {
        let file = write_config("[table]\npage_size = 20\n");
        assert_eq!(Config::load_from(file.path()).unwrap().table.page_size.get(), 20);

        let file = write_config("[table]\npage_size = 7\n");
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_invalid_base_url() {
        let file = write_config("[api]\nbase_url = \"not a url\"\n");
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
