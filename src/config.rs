//! Configuration stored as TOML in the OS config directory.
//!
//! - Windows: %APPDATA%\release-reconciler\config.toml
//! - macOS: ~/Library/Application Support/release-reconciler/config.toml
//! - Linux: ~/.config/release-reconciler/config.toml
//!
//! Every section is optional; missing keys fall back to defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::reconcile::CorrectionSettings;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which provider each naming field is corrected from
    pub sources: CorrectionSettings,

    /// Provider HTTP settings
    pub http: HttpConfig,
}

/// Provider HTTP settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout
    pub timeout_secs: u64,

    /// Application name/version sent as the User-Agent
    pub user_agent: String,

    /// Contact URL or email appended to the User-Agent, as MusicBrainz asks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,

    pub itunes_base_url: String,

    pub musicbrainz_base_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("ReleaseReconciler/", env!("CARGO_PKG_VERSION")).to_string(),
            contact: None,
            itunes_base_url: "https://itunes.apple.com".to_string(),
            musicbrainz_base_url: "https://musicbrainz.org/ws/2".to_string(),
        }
    }
}

impl HttpConfig {
    /// User-Agent header value, e.g. `ReleaseReconciler/0.1.0 ( me@example.org )`.
    pub fn user_agent_header(&self) -> String {
        match self.contact.as_deref().map(str::trim) {
            Some(contact) if !contact.is_empty() => format!("{} ( {} )", self.user_agent, contact),
            _ => self.user_agent.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("release-reconciler"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location.
///
/// Never fails: a missing or unreadable file yields the defaults.
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            tracing::warn!("Could not determine config directory, using defaults");
            Config::default()
        }
    }
}

/// Load configuration from an explicit path, falling back to defaults.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            return Config::default();
        }
    };

    match toml::from_str(&contents) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            tracing::error!("Failed to parse config file {:?}: {}", path, e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Save configuration to the default location.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Save configuration to `path`, creating parent directories.
///
/// Written to a sibling temp file first, then renamed into place.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
