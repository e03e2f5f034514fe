//! Console configuration.
//!
//! Configuration is an explicit value handed to the components at startup.
//! Nothing here carries a built-in endpoint or key: when no backend is
//! configured the console runs on offline datasets only.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_OVERSCAN: usize = 10;
pub const DEFAULT_ROW_HEIGHT: f32 = 22.0;

const ENDPOINT_VARS: [&str; 2] = ["OPSDESK_ENDPOINT_URL", "VITE_SUPABASE_URL"];
const PUBLIC_KEY_VARS: [&str; 2] = ["OPSDESK_PUBLIC_KEY", "VITE_SUPABASE_ANON_KEY"];
const ACCESS_TOKEN_VAR: &str = "OPSDESK_ACCESS_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid endpoint url {0:?}: expected http(s)://host")]
    InvalidEndpoint(String),
    #[error("public key is empty")]
    MissingKey,
}

/// Connection settings for the hosted REST backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base url, e.g. `https://xyz.supabase.co`
    pub endpoint_url: String,
    /// Anonymous/public API key sent as `apikey`
    pub public_key: String,
    /// Session token sent as bearer; falls back to the public key
    #[serde(default)]
    pub access_token: Option<String>,
}

impl BackendConfig {
    pub fn new(endpoint_url: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            public_key: public_key.into(),
            access_token: None,
        }
    }

    /// Checks the endpoint scheme and that a key is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.endpoint_url)
            .map_err(|_| ConfigError::InvalidEndpoint(self.endpoint_url.clone()))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ConfigError::InvalidEndpoint(self.endpoint_url.clone()));
        }
        if self.public_key.trim().is_empty() {
            return Err(ConfigError::MissingKey);
        }
        Ok(())
    }

    /// Token for the `Authorization: Bearer` header.
    pub fn bearer_token(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.public_key)
    }

    /// Reads the backend settings from the environment using `lookup`.
    ///
    /// Returns `None` when either the endpoint or the key is missing.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .find(|value| !value.trim().is_empty())
        };
        let endpoint_url = first(&ENDPOINT_VARS)?;
        let public_key = first(&PUBLIC_KEY_VARS)?;
        Some(Self {
            endpoint_url,
            public_key,
            access_token: lookup(ACCESS_TOKEN_VAR).filter(|t| !t.is_empty()),
        })
    }

    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// Top-level console configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub backend: Option<BackendConfig>,
    pub page_size: usize,
    pub overscan: usize,
    pub row_height: f32,
    pub scroll_interval_ms: u64,
    pub resize_debounce_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            backend: None,
            page_size: DEFAULT_PAGE_SIZE,
            overscan: DEFAULT_OVERSCAN,
            row_height: DEFAULT_ROW_HEIGHT,
            scroll_interval_ms: crate::throttle::DEFAULT_SCROLL_INTERVAL.as_millis() as u64,
            resize_debounce_ms: crate::throttle::DEFAULT_RESIZE_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl ConsoleConfig {
    /// Per-user config file location (`<config dir>/opsdesk/config.json`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("opsdesk").join("config.json"))
    }

    /// Parses a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Resolves the configuration for the console.
    ///
    /// Order: explicit `path`, then the per-user file if it exists, then
    /// defaults. Backend settings from the environment fill in a missing
    /// `backend` section. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        if config.backend.is_none() {
            config.backend = BackendConfig::from_env();
        }

        config.validate()?;
        log::info!(
            "configuration loaded (backend: {})",
            config
                .backend
                .as_ref()
                .map(|b| b.endpoint_url.as_str())
                .unwrap_or("none")
        );
        Ok(config)
    }

    /// Validates the backend section and clamps numeric settings into range.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if let Some(backend) = &self.backend {
            backend.validate()?;
        }
        self.page_size = self.page_size.clamp(1, 1000);
        if !(self.row_height.is_finite() && self.row_height >= crate::windowing::MIN_ITEM_HEIGHT) {
            self.row_height = DEFAULT_ROW_HEIGHT;
        }
        Ok(())
    }

    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_interval_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_lookup_prefers_native_names() {
        let lookup = lookup_from(&[
            ("OPSDESK_ENDPOINT_URL", "https://a.example.com"),
            ("VITE_SUPABASE_URL", "https://b.example.com"),
            ("VITE_SUPABASE_ANON_KEY", "anon"),
        ]);
        let backend = BackendConfig::from_lookup(lookup).unwrap();
        assert_eq!(backend.endpoint_url, "https://a.example.com");
        assert_eq!(backend.public_key, "anon");
        assert_eq!(backend.bearer_token(), "anon");
    }

    #[test]
    fn test_env_lookup_requires_both_values() {
        let lookup = lookup_from(&[("VITE_SUPABASE_URL", "https://b.example.com")]);
        assert!(BackendConfig::from_lookup(lookup).is_none());
        let lookup = lookup_from(&[("OPSDESK_ENDPOINT_URL", "https://b.example.com"), ("OPSDESK_PUBLIC_KEY", " ")]);
        assert!(BackendConfig::from_lookup(lookup).is_none());
    }

    #[test]
    fn test_validate_endpoint() {
        assert!(BackendConfig::new("https://x.supabase.co", "k").validate().is_ok());
        assert!(matches!(
            BackendConfig::new("ftp://x", "k").validate(),
            Err(ConfigError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            BackendConfig::new("not a url", "k").validate(),
            Err(ConfigError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            BackendConfig::new("http://localhost:54321", "").validate(),
            Err(ConfigError::MissingKey)
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut config = ConsoleConfig::from_json_str(r#"{"page_size": 0, "row_height": -4}"#).unwrap();
        config.validate().unwrap();
        assert_eq!(config.page_size, 1);
        assert_eq!(config.row_height, DEFAULT_ROW_HEIGHT);
        assert_eq!(config.overscan, DEFAULT_OVERSCAN);
        assert!(config.backend.is_none());
    }

    #[test]
    fn test_backend_section_parses() {
        let config = ConsoleConfig::from_json_str(
            r#"{"backend": {"endpoint_url": "https://x.supabase.co", "public_key": "pk", "access_token": "jwt"}}"#,
        )
        .unwrap();
        let backend = config.backend.unwrap();
        assert_eq!(backend.bearer_token(), "jwt");
    }

    #[test]
    fn test_from_file_missing() {
        let path = std::env::temp_dir().join("opsdesk_missing_config_file.json");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(ConsoleConfig::from_file(&path), Err(ConfigError::Io { .. })));
    }
}
