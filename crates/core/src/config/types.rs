use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use crate::metadata::OmdbConfig;
pub use crate::site::SiteConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub site: SiteConfig,
    /// Remote lookup for the json backend (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omdb: Option<OmdbConfig>,
}

/// Storage configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Backing file; defaults depend on the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Configured path, or the backend's default file name.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| self.backend.default_path())
    }
}

/// Available storage backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Csv,
    #[default]
    Json,
}

impl StorageBackend {
    pub fn default_path(self) -> PathBuf {
        match self {
            Self::Csv => PathBuf::from("movies.csv"),
            Self::Json => PathBuf::from("data.json"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Sanitized config for display (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub storage: SanitizedStorageConfig,
    pub site: SiteConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omdb: Option<SanitizedOmdbConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStorageConfig {
    pub backend: String,
    pub path: PathBuf,
}

/// Sanitized OMDb config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedOmdbConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            storage: SanitizedStorageConfig {
                backend: config.storage.backend.as_str().to_string(),
                path: config.storage.resolved_path(),
            },
            site: config.site.clone(),
            omdb: config.omdb.as_ref().map(|o| SanitizedOmdbConfig {
                base_url: o.base_url.clone(),
                api_key_configured: !o.api_key.is_empty(),
                timeout_secs: o.timeout_secs,
                max_retries: o.max_retries,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Json);
        assert_eq!(config.storage.resolved_path(), PathBuf::from("data.json"));
        assert_eq!(config.site, SiteConfig::default());
        assert!(config.omdb.is_none());
    }

    #[test]
    fn test_csv_backend_default_path() {
        let toml = r#"
[storage]
backend = "csv"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Csv);
        assert_eq!(config.storage.resolved_path(), PathBuf::from("movies.csv"));
    }

    #[test]
    fn test_deserialize_with_custom_storage_path() {
        let toml = r#"
[storage]
backend = "json"
path = "/data/my-movies.json"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.storage.resolved_path(),
            PathBuf::from("/data/my-movies.json")
        );
    }

    #[test]
    fn test_unknown_backend_fails() {
        let toml = r#"
[storage]
backend = "sqlite"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_with_omdb_config() {
        let toml = r#"
[omdb]
api_key = "test-api-key"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let omdb = config.omdb.as_ref().unwrap();
        assert_eq!(omdb.api_key, "test-api-key");
        assert_eq!(omdb.base_url, "http://www.omdbapi.com/");
        assert_eq!(omdb.timeout_secs, 10); // default
    }

    #[test]
    fn test_sanitized_config_hides_api_key() {
        let config = Config {
            omdb: Some(OmdbConfig::new("secret-key")),
            ..Config::default()
        };

        let sanitized = SanitizedConfig::from(&config);
        assert_eq!(sanitized.storage.backend, "json");
        assert_eq!(sanitized.storage.path, PathBuf::from("data.json"));

        let omdb = sanitized.omdb.as_ref().unwrap();
        assert!(omdb.api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-key"));
    }
}
