//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (TODOS_*)
//! 2. TOML config file (if TODOS_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::model::SortDirection;

mod validation;

pub use validation::ConfigError;

/// Which collection implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Hosted PostgREST table (Supabase).
    #[default]
    Postgrest,
    /// In-process table, lost on exit.
    Memory,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (TODOS_*)
/// 2. TOML config file (if TODOS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Collection backend.
    ///
    /// Set via TODOS_BACKEND (`postgrest` or `memory`).
    #[serde(default)]
    pub backend: Backend,

    /// Project URL, e.g. `https://abc.supabase.co`.
    ///
    /// Set via TODOS_SUPABASE_URL environment variable.
    /// Required only for the postgrest backend.
    #[serde(default)]
    pub supabase_url: Option<String>,

    /// Anonymous API key sent as `apikey` and bearer token.
    ///
    /// Set via TODOS_SUPABASE_ANON_KEY environment variable.
    #[serde(default)]
    pub supabase_anon_key: Option<String>,

    /// Remote table name.
    ///
    /// Set via TODOS_TABLE environment variable.
    #[serde(default = "default_table")]
    pub table: String,

    /// Items per page.
    ///
    /// Set via TODOS_PAGE_SIZE environment variable.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Ordering over `updated_at`.
    ///
    /// Set via TODOS_SORT environment variable.
    #[serde(default)]
    pub sort: SortDirection,

    /// Path to the SQLite preference database.
    ///
    /// Set via TODOS_PREFS_PATH environment variable.
    #[serde(default = "default_prefs_path")]
    pub prefs_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via TODOS_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via TODOS_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_table() -> String {
    "todos".into()
}

fn default_page_size() -> u32 {
    10
}

fn default_prefs_path() -> PathBuf {
    PathBuf::from("./todos-prefs.sqlite")
}

fn default_user_agent() -> String {
    "mcp-todos/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            supabase_url: None,
            supabase_anon_key: None,
            table: default_table(),
            page_size: default_page_size(),
            sort: SortDirection::default(),
            prefs_path: default_prefs_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `TODOS_`
    /// 2. TOML file from `TODOS_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment cannot be parsed,
    /// or validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("TODOS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("TODOS_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Return `(url, anon_key)` for the hosted backend (deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming whichever value is unset.
    pub fn require_remote(&self) -> Result<(&str, &str), ConfigError> {
        let url = self.supabase_url.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "supabase_url".into(),
            hint: "Set TODOS_SUPABASE_URL environment variable".into(),
        })?;
        let key = self.supabase_anon_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "supabase_anon_key".into(),
            hint: "Set TODOS_SUPABASE_ANON_KEY environment variable".into(),
        })?;
        Ok((url, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.backend, Backend::Postgrest);
        assert_eq!(config.table, "todos");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.sort, SortDirection::Descending);
        assert_eq!(config.prefs_path, PathBuf::from("./todos-prefs.sqlite"));
        assert_eq!(config.user_agent, "mcp-todos/0.1");
        assert_eq!(config.timeout_ms, 10_000);
        assert!(config.supabase_url.is_none());
        assert!(config.supabase_anon_key.is_none());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn test_require_remote_missing_url() {
        let config = AppConfig { supabase_anon_key: Some("anon".into()), ..Default::default() };
        let result = config.require_remote();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "supabase_url"));
    }

    #[test]
    fn test_require_remote_missing_key() {
        let config = AppConfig { supabase_url: Some("https://abc.supabase.co".into()), ..Default::default() };
        let result = config.require_remote();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "supabase_anon_key"));
    }

    #[test]
    fn test_require_remote_present() {
        let config = AppConfig {
            supabase_url: Some("https://abc.supabase.co".into()),
            supabase_anon_key: Some("anon".into()),
            ..Default::default()
        };
        let (url, key) = config.require_remote().unwrap();
        assert_eq!(url, "https://abc.supabase.co");
        assert_eq!(key, "anon");
    }

    #[test]
    fn test_backend_deserialize() {
        let backend: Backend = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(backend, Backend::Memory);
    }
}
