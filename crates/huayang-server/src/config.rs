//! Server configuration
//!
//! Defaults, then an optional TOML file, then command-line flags and
//! environment variables (applied by the binary through the `with_*`
//! builders).

use crate::error::ServerError;
use huayang_assist::GeminiConfig;
use huayang_core::{RecoveryPolicy, StaticCredentials, DEFAULT_DISPLAY_NAME};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Editor account settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Login name
    pub username: String,
    /// Password; without one every login fails
    pub password: Option<String>,
    /// Name shown in the header (defaults to the username)
    pub display_name: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_DISPLAY_NAME.to_string(),
            password: None,
            display_name: None,
        }
    }
}

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: SocketAddr,
    /// Directory holding the durable volume slot
    pub data_dir: PathBuf,
    /// Handling of unreadable volume data
    pub recovery: RecoveryPolicy,
    /// Saving-indicator duration in milliseconds
    pub save_indicator_ms: u64,
    /// Editor account
    pub admin: AdminConfig,
    /// Generation service
    pub gemini: GeminiConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_dir: PathBuf::from("data"),
            recovery: RecoveryPolicy::default(),
            save_indicator_ms: 500,
            admin: AdminConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ServerError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file
    pub async fn load(path: &Path) -> Result<Self, ServerError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ServerError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// With listen address
    #[inline]
    #[must_use]
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// With data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// With recovery policy
    #[inline]
    #[must_use]
    pub fn with_recovery(mut self, policy: RecoveryPolicy) -> Self {
        self.recovery = policy;
        self
    }

    /// With editor username
    #[inline]
    #[must_use]
    pub fn with_admin_user(mut self, username: impl Into<String>) -> Self {
        self.admin.username = username.into();
        self
    }

    /// With editor password
    #[inline]
    #[must_use]
    pub fn with_admin_password(mut self, password: impl Into<String>) -> Self {
        self.admin.password = Some(password.into());
        self
    }

    /// With Gemini API key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini = self.gemini.with_api_key(key);
        self
    }

    /// Saving-indicator duration
    #[inline]
    #[must_use]
    pub fn save_indicator(&self) -> Duration {
        Duration::from_millis(self.save_indicator_ms)
    }

    /// Credentials for the configured editor account
    #[must_use]
    pub fn credentials(&self) -> StaticCredentials {
        let admin = &self.admin;
        let credentials = match &admin.password {
            Some(password) => StaticCredentials::new(admin.username.clone(), password.clone()),
            None => StaticCredentials::disabled(admin.username.clone()),
        };
        match &admin.display_name {
            Some(name) => credentials.with_display_name(name.clone()),
            None => credentials,
        }
    }
}
