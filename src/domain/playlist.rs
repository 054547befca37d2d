// SPDX-License-Identifier: MPL-2.0
//! Playlist definitions: the sources a playlist scans and the filter it applies.
//!
//! Definitions are owned by an external store; this crate only reads them.

use super::media::MediaFilter;
use serde::{Deserialize, Serialize};

/// Whether a source designates a single file or a folder to walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    File,
    Folder,
}

/// A user-designated file or folder feeding a playlist's scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    /// Opaque URI-like identifier, resolved to a path by a `PathResolver`.
    pub identifier: String,
    pub kind: SourceKind,
    /// Only meaningful for folders: descend into subdirectories.
    #[serde(default)]
    pub recursive: bool,
}

impl Source {
    /// A single-file source.
    #[must_use]
    pub fn file(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            kind: SourceKind::File,
            recursive: false,
        }
    }

    /// A folder source, walked recursively or not.
    #[must_use]
    pub fn folder(identifier: impl Into<String>, recursive: bool) -> Self {
        Self {
            identifier: identifier.into(),
            kind: SourceKind::Folder,
            recursive,
        }
    }

    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.kind == SourceKind::Folder
    }
}

/// A playlist definition as read from the playlist store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Stable identifier used for load suppression and the result cache key.
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub filter: MediaFilter,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl Playlist {
    #[must_use]
    pub fn new(id: impl Into<String>, sources: Vec<Source>, filter: MediaFilter) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            filter,
            sources,
        }
    }
}
