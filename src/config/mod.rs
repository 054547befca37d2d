// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `MEDIA_DECK_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Live Settings
//!
//! [`Settings`] wraps a loaded [`Config`] in a single-writer value with change
//! notification. Components that derive state from preferences (such as the
//! browsing order) subscribe to it instead of re-reading the file.
//!
//! # Examples
//!
//! ```no_run
//! use media_deck::config::{self, SortOrder};
//!
//! let (mut config, _warning) = config::load();
//! config.sort_order = Some(SortOrder::Alphabetical);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;

const CONFIG_FILE: &str = "settings.toml";

/// Ordering of the browsing view. Navigation history is never reordered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// The order in which the scan discovered items.
    #[default]
    Discovery,
    Alphabetical,
    ReverseAlphabetical,
}

impl std::str::FromStr for SortOrder {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "discovery" => Ok(Self::Discovery),
            "alphabetical" | "name" => Ok(Self::Alphabetical),
            "reverse-alphabetical" | "reverse" => Ok(Self::ReverseAlphabetical),
            other => Err(Error::Config(format!("unknown sort order '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,

    /// Validity of cached folder listings, in days.
    #[serde(default = "default_folder_cache_days")]
    pub folder_cache_days: Option<u32>,

    /// Validity of cached playlist results, in minutes.
    #[serde(default = "default_playlist_cache_minutes")]
    pub playlist_cache_minutes: Option<u32>,

    #[serde(default = "default_batch_size")]
    pub batch_size: Option<usize>,

    /// Volume token to mount root, used to resolve document-tree identifiers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub volumes: BTreeMap<String, PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sort_order: None,
            folder_cache_days: default_folder_cache_days(),
            playlist_cache_minutes: default_playlist_cache_minutes(),
            batch_size: default_batch_size(),
            volumes: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Folder cache validity window, clamped to the supported range.
    #[must_use]
    pub fn folder_cache_validity(&self) -> Duration {
        let days = self
            .folder_cache_days
            .unwrap_or(DEFAULT_FOLDER_CACHE_DAYS)
            .clamp(MIN_FOLDER_CACHE_DAYS, MAX_FOLDER_CACHE_DAYS);
        Duration::from_secs(u64::from(days) * 24 * 60 * 60)
    }

    /// Playlist cache validity window, clamped to the supported range.
    #[must_use]
    pub fn playlist_cache_validity(&self) -> Duration {
        let minutes = self
            .playlist_cache_minutes
            .unwrap_or(DEFAULT_PLAYLIST_CACHE_MINUTES)
            .clamp(MIN_PLAYLIST_CACHE_MINUTES, MAX_PLAYLIST_CACHE_MINUTES);
        Duration::from_secs(u64::from(minutes) * 60)
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
            .unwrap_or(DEFAULT_BATCH_SIZE)
            .clamp(MIN_BATCH_SIZE, MAX_BATCH_SIZE)
    }

    #[must_use]
    pub fn sort_order(&self) -> SortOrder {
        self.sort_order.unwrap_or_default()
    }
}

fn default_folder_cache_days() -> Option<u32> {
    Some(DEFAULT_FOLDER_CACHE_DAYS)
}

fn default_playlist_cache_minutes() -> Option<u32> {
    Some(DEFAULT_PLAYLIST_CACHE_MINUTES)
}

fn default_batch_size() -> Option<usize> {
    Some(DEFAULT_BATCH_SIZE)
}

// =============================================================================
// Live Settings
// =============================================================================

/// Shared configuration value with change notification.
///
/// Clones share the same underlying value.
#[derive(Debug, Clone)]
pub struct Settings {
    tx: std::sync::Arc<watch::Sender<Config>>,
}

impl Settings {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let (tx, _) = watch::channel(config);
        Self {
            tx: std::sync::Arc::new(tx),
        }
    }

    /// Returns a snapshot of the current configuration.
    #[must_use]
    pub fn current(&self) -> Config {
        self.tx.borrow().clone()
    }

    /// Applies `change`, notifying subscribers only if the value differs.
    pub fn update(&self, change: impl FnOnce(&mut Config)) {
        self.tx.send_if_modified(|config| {
            let before = config.clone();
            change(config);
            *config != before
        });
    }

    pub fn set_sort_order(&self, sort_order: SortOrder) {
        self.update(|config| config.sort_order = Some(sort_order));
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Config> {
        self.tx.subscribe()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

// =============================================================================
// Load / Save
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "failed to load settings, using defaults");
                    return (
                        Config::default(),
                        Some(format!("could not load {}: {error}", path.display())),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}
