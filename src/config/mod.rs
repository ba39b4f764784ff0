//! Configuration module for meta-diag
//!
//! Supports configuration via file and environment variables.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Metadata store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Path to the local metadata database file
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/metadata.db".to_string()
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// API target configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the governance API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_s")]
    pub timeout_s: u64,
    /// Endpoint fetched by the single-endpoint probe
    #[serde(default = "default_probe_path")]
    pub probe_path: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8001".to_string()
}

fn default_timeout_s() -> u64 {
    30
}

fn default_probe_path() -> String {
    "/api/fields?page=1&page_size=50".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_s: default_timeout_s(),
            probe_path: default_probe_path(),
        }
    }
}

impl ApiConfig {
    /// Full URL for the single-endpoint probe
    pub fn probe_url(&self) -> String {
        format!("{}{}", self.base_url, self.probe_path)
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Metadata store configuration
    #[serde(default)]
    pub db: DbConfig,
    /// API target configuration
    #[serde(default)]
    pub api: ApiConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> anyhow::Result<Self> {
        // Try to load .env file (ignore if not found)
        let _ = dotenvy::dotenv();

        let mut config = config::Config::builder();

        // Add default config
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // Try to load from config file if it exists
        if std::path::Path::new("config.toml").exists() {
            config = config.add_source(config::File::with_name("config").required(false));
        }

        // Override with environment variables, e.g. META_DIAG_API__BASE_URL
        config = config.add_source(
            config::Environment::with_prefix("META_DIAG")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).or_else(|_| serde_json::from_str(&contents))?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise from file + environment;
    /// any load failure is logged and falls back to defaults.
    pub fn load_or_default(path: &str) -> Self {
        let loaded = if std::path::Path::new(path).exists() {
            AppConfig::load_from_file(path)
        } else {
            AppConfig::load()
        };

        loaded.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        })
    }
}

/// Shared application state that holds runtime configuration
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<RwLock<AppConfig>>,
}

impl SharedConfig {
    /// Create a new shared configuration
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Get a read-only copy of the configuration
    pub fn get(&self) -> AppConfig {
        self.inner.read().clone()
    }

    /// Update the metadata store configuration
    pub fn update_db(&self, db: DbConfig) {
        self.inner.write().db = db;
    }

    /// Update the API target configuration
    pub fn update_api(&self, api: ApiConfig) {
        self.inner.write().api = api;
    }

    /// Update the entire configuration
    pub fn update(&self, config: AppConfig) {
        *self.inner.write() = config;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db.path, "data/metadata.db");
        assert_eq!(config.api.base_url, "http://127.0.0.1:8001");
        assert_eq!(config.api.timeout_s, 30);
    }

    #[test]
    fn test_probe_url() {
        let config = AppConfig::default();
        assert_eq!(
            config.api.probe_url(),
            "http://127.0.0.1:8001/api/fields?page=1&page_size=50"
        );
    }

    #[test]
    fn test_shared_config() {
        let config = AppConfig::default();
        let shared = SharedConfig::new(config);

        let api = ApiConfig {
            base_url: "http://10.0.0.5:8001".to_string(),
            timeout_s: 5,
            ..ApiConfig::default()
        };
        shared.update_api(api);

        let updated = shared.get();
        assert_eq!(updated.api.base_url, "http://10.0.0.5:8001");
        assert_eq!(updated.api.timeout_s, 5);
    }

    #[test]
    fn test_load_reads_prefixed_env_vars() {
        std::env::set_var("META_DIAG_API__TIMEOUT_S", "7");
        let config = AppConfig::load().unwrap();
        std::env::remove_var("META_DIAG_API__TIMEOUT_S");

        assert_eq!(config.api.timeout_s, 7);
        // Untouched fields keep their defaults
        assert_eq!(config.db.path, "data/metadata.db");
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[db]\npath = \"/tmp/meta.db\"\n\n[api]\nbase_url = \"http://localhost:8101\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.db.path, "/tmp/meta.db");
        assert_eq!(config.api.base_url, "http://localhost:8101");
        // Unspecified fields keep their defaults
        assert_eq!(config.api.timeout_s, 30);
    }
}
