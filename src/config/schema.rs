//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable selecting the API base URL at deployment time
pub const API_URL_ENV: &str = "CAMPUS_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub router: RouterConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Absolute URL, or a path prefix resolved against `origin`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Origin used when `base_url` is relative
    #[serde(default = "default_origin")]
    pub origin: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    env::var(API_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| "/api".to_string())
}

fn default_origin() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_ms() -> u64 {
    15_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            origin: default_origin(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ApiConfig {
    /// Absolute base URL every endpoint path is appended to, without a trailing slash
    pub fn resolved_base_url(&self) -> String {
        let base = self.base_url.trim();
        if base.starts_with("http://") || base.starts_with("https://") {
            return base.trim_end_matches('/').to_string();
        }

        let origin = self.origin.trim().trim_end_matches('/');
        let prefix = base.trim_matches('/');
        if prefix.is_empty() {
            origin.to_string()
        } else {
            format!("{}/{}", origin, prefix)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Session persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// JSON file backing the key-value session storage
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    /// Lifetime applied when the token endpoint omits `expires_in`
    #[serde(default = "default_expires_in_secs")]
    pub default_expires_in_secs: u64,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".campus/session.json")
}

fn default_expires_in_secs() -> u64 {
    30 * 60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            default_expires_in_secs: default_expires_in_secs(),
        }
    }
}

/// Navigation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

fn default_login_path() -> String {
    "/login".to_string()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
        }
    }
}
