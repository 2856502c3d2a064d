//! Configuration loading.
//!
//! Layers, lowest to highest precedence:
//! 1. Built-in defaults, so a first run needs no setup at all
//! 2. `~/.airlock/config.toml`, or the file passed on the command line
//! 3. Environment: `AIRLOCK_API_KEY` overrides `[lookup] api_key`
//!
//! A missing config file is not an error; invalid TOML in an existing
//! file is.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `[lookup] api_key`.
pub const API_KEY_ENV: &str = "AIRLOCK_API_KEY";

/// Directory under the home dir holding config and the account store.
const APP_DIR: &str = ".airlock";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub lookup: LookupConfig,
}

/// `[store]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the accounts CSV. A leading `~` expands to the home
    /// directory.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: format!("~/{APP_DIR}/accounts.csv"),
        }
    }
}

/// `[auth]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Login attempts per session before lockout.
    pub max_login_attempts: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            max_login_attempts: crate::auth::MAX_LOGIN_ATTEMPTS,
        }
    }
}

/// `[lookup]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// OpenWeatherMap API key. Absent means air quality queries are
    /// unavailable until the environment supplies one.
    pub api_key: Option<String>,
}

impl Config {
    /// Load configuration. An explicit `path` wins over the default
    /// location; a missing file yields the defaults. Environment
    /// overrides apply last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(given) => given.to_path_buf(),
            None => default_config_path(),
        };

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Invalid config at {}", path.display()))?
        } else {
            Self::default()
        };
        config.override_api_key(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Replace the configured key when the override carries a non-empty
    /// value.
    fn override_api_key(&mut self, value: Option<String>) {
        if let Some(key) = value {
            let key = key.trim();
            if !key.is_empty() {
                self.lookup.api_key = Some(key.to_string());
            }
        }
    }

    /// Store path with `~` expanded.
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.store.path).into_owned())
    }

    /// API key, if any source provided one.
    pub fn api_key(&self) -> Option<&str> {
        self.lookup.api_key.as_deref()
    }
}

/// `~/.airlock/config.toml`, falling back to the working directory when
/// no home directory can be determined.
pub fn default_config_path() -> PathBuf {
    match directories::BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(APP_DIR).join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_cover_every_section() {
        let config = Config::default();
        assert!(config.store.path.ends_with("accounts.csv"));
        assert_eq!(config.auth.max_login_attempts, 5);
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load(Some(&tmp.path().join("absent.toml"))).unwrap();
        assert_eq!(config.auth.max_login_attempts, 5);
    }

    #[test]
    fn full_file_parses() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[store]
path = "/tmp/custom-accounts.csv"

[auth]
max_login_attempts = 3

[lookup]
api_key = "from-file"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.store.path, "/tmp/custom-accounts.csv");
        assert_eq!(config.auth.max_login_attempts, 3);
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[auth]\nmax_login_attempts = 2\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.auth.max_login_attempts, 2);
        assert!(config.store.path.ends_with("accounts.csv"));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[store\npath = ").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn env_value_beats_file_value() {
        let mut config = Config {
            lookup: LookupConfig {
                api_key: Some("from-file".to_string()),
            },
            ..Config::default()
        };
        config.override_api_key(Some("from-env".to_string()));
        assert_eq!(config.api_key(), Some("from-env"));
    }

    #[test]
    fn blank_env_value_is_ignored() {
        let mut config = Config::default();
        config.override_api_key(Some("   ".to_string()));
        assert_eq!(config.api_key(), None);
        config.override_api_key(None);
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn tilde_paths_expand() {
        let config = Config {
            store: StoreConfig {
                path: "~/elsewhere/accounts.csv".to_string(),
            },
            ..Config::default()
        };
        assert!(config.store_path().ends_with("elsewhere/accounts.csv"));
    }
}
