//! Application configuration management.
//!
//! Holds the API base URL, the storage namespace and backend, the welcome
//! toast, and the last email used to sign in.
//!
//! Configuration is stored at `~/.config/hamburgueria/config.json`. Any
//! field can be overridden from the environment (or a `.env` file loaded by
//! the binary):
//!
//! - `HAMBURGUERIA_API_URL`
//! - `HAMBURGUERIA_NAMESPACE`
//! - `HAMBURGUERIA_STORE` (`file`, `keyring` or `memory`)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::auth::{SessionOptions, DEFAULT_NAMESPACE};
use crate::notify::Toast;
use crate::storage::StoreKind;

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "hamburgueria";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// API used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

pub const ENV_API_URL: &str = "HAMBURGUERIA_API_URL";
pub const ENV_NAMESPACE: &str = "HAMBURGUERIA_NAMESPACE";
pub const ENV_STORE: &str = "HAMBURGUERIA_STORE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub namespace: String,
    pub store: StoreKind,
    pub welcome: Toast,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            store: StoreKind::default(),
            welcome: Toast::default(),
            last_email: None,
        }
    }
}

impl Config {
    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Override fields from variables resolved by `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(namespace) = lookup(ENV_NAMESPACE).filter(|v| !v.trim().is_empty()) {
            self.namespace = namespace.trim().to_string();
        }
        if let Some(store) = lookup(ENV_STORE) {
            self.store = store
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .with_context(|| format!("Invalid {}", ENV_STORE))?;
        }
        Ok(())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            namespace: self.namespace.clone(),
            welcome: self.welcome.clone(),
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.namespace, "Hamburgueria");
        assert_eq!(config.store, StoreKind::File);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join(CONFIG_FILE);
        let config = Config {
            last_email: Some("a@x.com".to_string()),
            store: StoreKind::Keyring,
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"api_url":"https://api.example.com"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.welcome, Toast::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                (ENV_API_URL, " https://burger.example.com "),
                (ENV_NAMESPACE, "Pizzaria"),
                (ENV_STORE, "memory"),
            ]))
            .unwrap();

        assert_eq!(config.api_url, "https://burger.example.com");
        assert_eq!(config.namespace, "Pizzaria");
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.session_options().namespace, "Pizzaria");
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[(ENV_API_URL, "  "), (ENV_NAMESPACE, "")]))
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_store_override_is_an_error() {
        let mut config = Config::default();
        let result = config.apply_overrides(env(&[(ENV_STORE, "redis")]));
        assert!(result.is_err());
    }
}
