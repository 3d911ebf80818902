//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\stream-resolver\config.toml
//! - macOS: ~/Library/Application Support/stream-resolver/config.toml
//! - Linux: ~/.config/stream-resolver/config.toml
//!
//! The upstream endpoint pools live here rather than in code so operators
//! can rotate dead mirrors without a rebuild, and tests can point pools at
//! fake endpoints.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::resolver::fetch::{INSTANCE_TIMEOUT_MS, SEARCH_TIMEOUT_MS};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Metadata-search mirror pool
    pub saavn: SaavnConfig,

    /// First instance-lookup pool (Piped-style streams API)
    pub instance_a: PoolConfig,

    /// Second instance-lookup pool (Invidious-style videos API)
    pub instance_b: PoolConfig,
}

/// Metadata-search settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SaavnConfig {
    /// Mirror base URLs in priority order (first = most preferred)
    pub base_urls: Vec<String>,

    /// Per-call budget in milliseconds
    pub timeout_ms: u64,
}

impl Default for SaavnConfig {
    fn default() -> Self {
        Self {
            base_urls: vec!["https://saavn.dev".to_string()],
            timeout_ms: SEARCH_TIMEOUT_MS,
        }
    }
}

/// One instance pool: interchangeable mirrors sharing an API shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PoolConfig {
    /// Mirror base URLs in priority order (first = most preferred)
    pub base_urls: Vec<String>,

    /// Lookup path with a `{id}` placeholder
    pub path_template: String,

    /// Per-instance budget in milliseconds
    pub timeout_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            base_urls: Vec::new(),
            path_template: "/{id}".to_string(),
            timeout_ms: INSTANCE_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Built-in pools used when no config file exists.
    pub fn builtin() -> Self {
        Self {
            saavn: SaavnConfig::default(),
            instance_a: PoolConfig {
                base_urls: vec![
                    "https://pipedapi.kavin.rocks".to_string(),
                    "https://api.piped.projectsegfau.lt".to_string(),
                    "https://pipedapi.adminforge.de".to_string(),
                ],
                path_template: "/streams/{id}".to_string(),
                timeout_ms: INSTANCE_TIMEOUT_MS,
            },
            instance_b: PoolConfig {
                base_urls: vec![
                    "https://inv.nadeko.net".to_string(),
                    "https://invidious.nerdvpn.de".to_string(),
                    "https://yewtu.be".to_string(),
                ],
                path_template: "/api/v1/videos/{id}".to_string(),
                timeout_ms: INSTANCE_TIMEOUT_MS,
            },
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("stream-resolver"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns the built-in pools if no file exists or it can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using built-in pools");
        return Config::builtin();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using built-in pools", path);
        return Config::builtin();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using built-in pools");
                Config::builtin()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::builtin()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDir(dir.clone(), e))?;

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

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
