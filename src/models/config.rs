//! Configuration model.
//!
//! Settings come from `~/.config/toon_catalog/config.toml` when present.
//! Service credentials and the app version are read from the environment:
//! - `TOON_CATALOG_URL`: catalog document location (URL or file path)
//! - `FIREBASE_*`: identity/database service configuration
//! - `CHAT_CLEAR_PASSWORD`: password required to wipe the chat
//! - `APP_VERSION`: version string shown by `--version`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_CATALOG_URL: &str = "https://toon-catalog.web.app/data/cartoons.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog configuration.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Directory holding persistent storage.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    /// Identity/database service configuration.
    #[serde(default)]
    pub identity: FirebaseConfig,
    /// Password required to clear the chat.
    #[serde(default = "chat_clear_password_from_env")]
    pub chat_clear_password: Option<String>,
    /// Application version string.
    #[serde(default = "app_version_from_env")]
    pub app_version: String,
}

/// Catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog document location.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Hosted identity/database service configuration.
///
/// Values are passed through to the service untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FirebaseConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
    pub database_url: Option<String>,
}

impl FirebaseConfig {
    /// Read the configuration from `FIREBASE_*` environment variables.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            api_key: var("FIREBASE_API_KEY"),
            auth_domain: var("FIREBASE_AUTH_DOMAIN"),
            project_id: var("FIREBASE_PROJECT_ID"),
            storage_bucket: var("FIREBASE_STORAGE_BUCKET"),
            messaging_sender_id: var("FIREBASE_MESSAGING_SENDER_ID"),
            app_id: var("FIREBASE_APP_ID"),
            database_url: var("FIREBASE_DATABASE_URL"),
        }
    }

    /// Fill unset values from another configuration.
    fn or(self, other: FirebaseConfig) -> Self {
        Self {
            api_key: self.api_key.or(other.api_key),
            auth_domain: self.auth_domain.or(other.auth_domain),
            project_id: self.project_id.or(other.project_id),
            storage_bucket: self.storage_bucket.or(other.storage_bucket),
            messaging_sender_id: self.messaging_sender_id.or(other.messaging_sender_id),
            app_id: self.app_id.or(other.app_id),
            database_url: self.database_url.or(other.database_url),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            storage_dir: default_storage_dir(),
            identity: FirebaseConfig::from_env(),
            chat_clear_password: chat_clear_password_from_env(),
            app_version: app_version_from_env(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toon_catalog")
}

fn chat_clear_password_from_env() -> Option<String> {
    std::env::var("CHAT_CLEAR_PASSWORD").ok()
}

fn app_version_from_env() -> String {
    std::env::var("APP_VERSION").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string())
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toon_catalog")
}

/// Load configuration from file, then apply environment overrides.
pub fn load_config() -> Config {
    let config_path = dirs_config_path().join("config.toml");

    let mut config = Config::default();
    if config_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&config_path) {
            match parse_config(&content) {
                Ok(parsed) => config = parsed,
                Err(e) => tracing::warn!("Ignoring invalid config {:?}: {}", config_path, e),
            }
        }
    }

    apply_env(config)
}

/// Parse a TOML configuration document.
pub fn parse_config(content: &str) -> crate::Result<Config> {
    Ok(toml::from_str(content)?)
}

/// Environment values win over the config file.
fn apply_env(mut config: Config) -> Config {
    if let Ok(url) = std::env::var("TOON_CATALOG_URL") {
        config.catalog.url = url;
    }
    config.identity = FirebaseConfig::from_env().or(config.identity);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config(
            r#"
            storage_dir = "/tmp/toons"

            [catalog]
            url = "/srv/cartoons.json"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.url, "/srv/cartoons.json");
        assert_eq!(config.catalog.timeout_secs, 5);
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/toons"));
    }

    #[test]
    fn test_firebase_or_keeps_set_values() {
        let primary = FirebaseConfig {
            api_key: Some("env-key".to_string()),
            ..Default::default()
        };
        let fallback = FirebaseConfig {
            api_key: Some("file-key".to_string()),
            project_id: Some("toons".to_string()),
            ..Default::default()
        };

        let merged = primary.or(fallback);
        assert_eq!(merged.api_key.as_deref(), Some("env-key"));
        assert_eq!(merged.project_id.as_deref(), Some("toons"));
    }
}
