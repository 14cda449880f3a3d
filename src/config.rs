//! Runtime configuration
//!
//! Read once at startup from `FITAI_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DATABASE_PATH_VAR: &str = "FITAI_DATABASE_PATH";
pub const FUNCTIONS_URL_VAR: &str = "FITAI_FUNCTIONS_URL";
pub const FUNCTIONS_KEY_VAR: &str = "FITAI_FUNCTIONS_KEY";
pub const HTTP_TIMEOUT_VAR: &str = "FITAI_HTTP_TIMEOUT_SECS";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive number of seconds, got '{value}'")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must be an http(s) URL, got '{value}'")]
    InvalidUrl { var: &'static str, value: String },
}

/// Credentials for the hosted AI functions
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionsConfig {
    pub url: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    /// `None` when either the URL or the key is missing
    pub functions: Option<FunctionsConfig>,
    pub http_timeout: Duration,
}

impl AppConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from any variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_path = get(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let functions = match (get(FUNCTIONS_URL_VAR), get(FUNCTIONS_KEY_VAR)) {
            (Some(url), Some(key)) => {
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    return Err(ConfigError::InvalidUrl {
                        var: FUNCTIONS_URL_VAR,
                        value: url,
                    });
                }
                Some(FunctionsConfig { url, key })
            }
            _ => None,
        };

        let http_timeout = match get(HTTP_TIMEOUT_VAR) {
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        var: HTTP_TIMEOUT_VAR,
                        value,
                    })
                }
            },
        };

        Ok(Self {
            database_path,
            functions,
            http_timeout,
        })
    }

    pub fn ai_enabled(&self) -> bool {
        self.functions.is_some()
    }
}

/// `data/fitai.db` under the project root (or next to the executable)
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("fitai.db");
    path
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert!(config.database_path.ends_with("data/fitai.db"));
        assert!(!config.ai_enabled());
        assert_eq!(config.http_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_functions_need_url_and_key() {
        let config = load(&[(FUNCTIONS_URL_VAR, "https://x.example.co")]).unwrap();
        assert!(config.functions.is_none());

        let config = load(&[
            (FUNCTIONS_URL_VAR, "https://x.example.co"),
            (FUNCTIONS_KEY_VAR, "anon"),
            (DATABASE_PATH_VAR, "/tmp/fit.db"),
        ])
        .unwrap();
        assert_eq!(config.functions.unwrap().key, "anon");
        assert_eq!(config.database_path, PathBuf::from("/tmp/fit.db"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[(HTTP_TIMEOUT_VAR, "0")]),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            load(&[(FUNCTIONS_URL_VAR, "ftp://x"), (FUNCTIONS_KEY_VAR, "k")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
