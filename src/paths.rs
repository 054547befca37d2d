// SPDX-License-Identifier: MPL-2.0
//! Application directory resolution.
//!
//! # Resolution Order
//!
//! 1. **Explicit override** passed to the `_with_override()` functions (tests, `--data-dir`)
//! 2. **Environment variables** (`MEDIA_DECK_DATA_DIR`, `MEDIA_DECK_CONFIG_DIR`)
//! 3. **Platform default** via `dirs`, with the application name appended
//!
//! Persistent caches live under `<data dir>/cache/`, while `settings.toml` and
//! `playlists.toml` live in the config directory.

use std::path::PathBuf;

/// Application name used for directory naming.
const APP_NAME: &str = "MediaDeck";

/// Sub-directory of the data directory holding cache records.
const CACHE_DIR: &str = "cache";

/// Environment variable to override the data directory.
pub const ENV_DATA_DIR: &str = "MEDIA_DECK_DATA_DIR";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "MEDIA_DECK_CONFIG_DIR";

fn env_dir(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Returns the application data directory path.
///
/// - Linux: `~/.local/share/MediaDeck/`
/// - macOS: `~/Library/Application Support/MediaDeck/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\MediaDeck\`
///
/// Returns `None` if the data directory cannot be determined.
#[must_use]
pub fn get_app_data_dir() -> Option<PathBuf> {
    get_app_data_dir_with_override(None)
}

/// Returns the data directory, preferring `override_path` when given.
#[must_use]
pub fn get_app_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }
    if let Some(path) = env_dir(ENV_DATA_DIR) {
        return Some(path);
    }
    dirs::data_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

/// Returns the application config directory path.
#[must_use]
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

/// Returns the config directory, preferring `override_path` when given.
#[must_use]
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }
    if let Some(path) = env_dir(ENV_CONFIG_DIR) {
        return Some(path);
    }
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

/// Returns the directory holding persistent cache records.
#[must_use]
pub fn get_cache_dir_with_override(data_dir_override: Option<PathBuf>) -> Option<PathBuf> {
    get_app_data_dir_with_override(data_dir_override).map(|mut path| {
        path.push(CACHE_DIR);
        path
    })
}
