use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "CLASSBOOK_CONFIG";
pub const URL_ENV: &str = "CLASSBOOK_URL";
pub const ANON_KEY_ENV: &str = "CLASSBOOK_ANON_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

/// Where the hosted backend lives and how to reach it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_url")]
    pub url: String,

    /// Public (anon) API key sent with every request.
    #[serde(default)]
    pub anon_key: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Persisted session of the signed-in user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: String,

    #[serde(default)]
    pub user_id: String,

    /// When the access token stops being accepted.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Refresh this long before the recorded expiry.
const EXPIRY_MARGIN_SECONDS: i64 = 60;

fn default_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            anon_key: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.classbook/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".classbook"))
    }

    /// Config file path: `$CLASSBOOK_CONFIG`, else ~/.classbook/config.toml
    pub fn config_file() -> Result<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from a file, falling back to defaults when it
    /// does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Override backend settings from `CLASSBOOK_URL` and `CLASSBOOK_ANON_KEY`.
    pub fn apply_env(&mut self) {
        if let Ok(url) = env::var(URL_ENV) {
            self.backend.url = url;
        }
        if let Ok(key) = env::var(ANON_KEY_ENV) {
            self.backend.anon_key = key;
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Check if a session has been persisted
    pub fn is_authenticated(&self) -> bool {
        !self.auth.access_token.is_empty()
    }

    /// Remember the tokens of a new session
    pub fn set_session(
        &mut self,
        access_token: String,
        refresh_token: String,
        user_id: String,
        expires_at: Option<DateTime<Utc>>,
    ) {
        self.auth.access_token = access_token;
        self.auth.refresh_token = refresh_token;
        self.auth.user_id = user_id;
        self.auth.expires_at = expires_at;
    }

    /// Whether the saved access token is expired (or about to be) and a
    /// refresh token is available to replace it.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        if !self.is_authenticated() || self.auth.refresh_token.is_empty() {
            return false;
        }
        match self.auth.expires_at {
            Some(expires_at) => expires_at - Duration::seconds(EXPIRY_MARGIN_SECONDS) <= now,
            None => false,
        }
    }

    /// Forget the persisted session
    pub fn clear_session(&mut self) {
        self.auth = AuthConfig::default();
    }
}
