use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OracleConfig {
    #[serde(default = "default_oracle_base_url")]
    pub base_url: String,
    /// Network timeout for the spot-price request, in seconds.
    #[serde(default = "default_oracle_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_oracle_base_url() -> String {
    "https://api.metals.live".to_string()
}

fn default_oracle_timeout_secs() -> u64 {
    5
}

impl Default for OracleConfig {
    fn default() -> Self {
        OracleConfig {
            base_url: default_oracle_base_url(),
            timeout_secs: default_oracle_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    /// Path to a JSON catalog file; the embedded seed catalog when absent.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file exists so the server boots with zero configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file at {}, using defaults", config_path.display());
            return Ok(AppConfig::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "aurum", "aurum")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
server:
  host: "0.0.0.0"
  port: 8080
oracle:
  base_url: "http://example.com/metals"
  timeout_secs: 2
catalog_path: "/tmp/rings.json"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.oracle.base_url, "http://example.com/metals");
        assert_eq!(config.oracle.timeout_secs, 2);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/rings.json")));
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.oracle.base_url, "https://api.metals.live");
        assert_eq!(config.oracle.timeout_secs, 5);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config: AppConfig =
            serde_yaml::from_str("server:\n  port: 9000\n").expect("Failed to deserialize");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.oracle.timeout_secs, 5);
    }

    #[test]
    fn test_load_from_missing_path() {
        let result = AppConfig::load_from_path("/nonexistent/config.yaml");
        assert!(result.is_err());
    }
}
