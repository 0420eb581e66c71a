//! Tool configuration for marq
//!
//! Configuration lives in a small TOML file (`marq/config.toml` under the
//! platform config directory by default) and can be overridden per
//! invocation via environment variables or CLI flags:
//!
//! - `MARQ_STORE_URL`: base URL of the grade record API
//! - `MARQ_STORE_TIMEOUT`: request timeout in seconds, clamped to [5, 300]

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MarqError, Result};
use crate::store::DEFAULT_TIMEOUT_SECONDS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarqConfig {
    /// Base URL of the grade record API (empty means unconfigured)
    #[serde(default)]
    pub store_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Default for MarqConfig {
    fn default() -> Self {
        Self {
            store_url: String::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl MarqConfig {
    /// Default config file location under the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("marq").join("config.toml"))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: MarqConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| MarqError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Load from the given path (or the default location) if the file
    /// exists, otherwise start from defaults; then apply env overrides.
    pub fn resolve(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        let mut config = match path {
            Some(ref p) if p.exists() => Self::load(p)?,
            _ => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("MARQ_STORE_URL") {
            if !url.is_empty() {
                self.store_url = url;
            }
        }

        if let Ok(timeout) = std::env::var("MARQ_STORE_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                self.timeout_seconds = seconds.clamp(5, 300);
            }
        }
    }

    /// Whether a store URL is available
    pub fn is_configured(&self) -> bool {
        !self.store_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_unconfigured() {
        let config = MarqConfig::default();
        assert!(config.store_url.is_empty());
        assert!(!config.is_configured());
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = MarqConfig {
            store_url: "https://grades.example.com/api".to_string(),
            timeout_seconds: 15,
        };
        config.save(&path).unwrap();

        let loaded = MarqConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_defaults_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "store_url = \"https://grades.example.com\"\n").unwrap();

        let loaded = MarqConfig::load(&path).unwrap();
        assert_eq!(loaded.store_url, "https://grades.example.com");
        assert_eq!(loaded.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }

    #[test]
    fn test_env_overrides_and_timeout_clamping() {
        let mut config = MarqConfig::default();
        std::env::set_var("MARQ_STORE_URL", "https://env.example.com");
        std::env::set_var("MARQ_STORE_TIMEOUT", "1");
        config.apply_env();
        assert_eq!(config.store_url, "https://env.example.com");
        assert_eq!(config.timeout_seconds, 5);

        std::env::set_var("MARQ_STORE_TIMEOUT", "1000");
        config.apply_env();
        assert_eq!(config.timeout_seconds, 300);

        std::env::remove_var("MARQ_STORE_URL");
        std::env::remove_var("MARQ_STORE_TIMEOUT");
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("marq").join("config.toml");
        MarqConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }
}
