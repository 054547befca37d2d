// SPDX-License-Identifier: MPL-2.0
//! TOML-backed playlist definitions (`playlists.toml`).
//!
//! ```toml
//! [[playlists]]
//! id = "holiday"
//! filter = "photos-only"
//!
//! [[playlists.sources]]
//! identifier = "/home/me/Pictures/2024"
//! kind = "folder"
//! recursive = true
//! ```

use crate::application::port::PlaylistRepository;
use crate::domain::playlist::Playlist;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name of the playlist definitions inside the config directory.
pub const PLAYLISTS_FILE: &str = "playlists.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct PlaylistFile {
    #[serde(default)]
    playlists: Vec<Playlist>,
}

/// Read-only playlist repository loaded from a TOML file.
#[derive(Debug, Clone, Default)]
pub struct TomlPlaylistRepository {
    playlists: Vec<Playlist>,
}

impl TomlPlaylistRepository {
    /// Loads definitions from `path`. A missing file yields an empty repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let file: PlaylistFile = toml::from_str(&content)?;
        Ok(Self {
            playlists: file.playlists,
        })
    }

    /// Writes `playlists` to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_to_path(playlists: &[Playlist], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = PlaylistFile {
            playlists: playlists.to_vec(),
        };
        fs::write(path, toml::to_string_pretty(&file)?)?;
        Ok(())
    }

    #[must_use]
    pub fn from_playlists(playlists: Vec<Playlist>) -> Self {
        Self { playlists }
    }
}

impl PlaylistRepository for TomlPlaylistRepository {
    fn playlist(&self, id: &str) -> Option<Playlist> {
        self.playlists.iter().find(|p| p.id == id).cloned()
    }

    fn playlists(&self) -> Vec<Playlist> {
        self.playlists.clone()
    }
}
