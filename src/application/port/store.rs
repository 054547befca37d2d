// SPDX-License-Identifier: MPL-2.0
//! Persistence port definitions.

use crate::domain::playlist::Playlist;
use crate::error::Result;

/// A simple string-keyed store of opaque records.
///
/// `put` must replace the whole record for a key; readers never observe a
/// partially written value.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored record, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Removes the record for `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<()>;

    /// Lists every stored key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be enumerated.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Read-only view of the external playlist definition store.
pub trait PlaylistRepository: Send + Sync {
    fn playlist(&self, id: &str) -> Option<Playlist>;

    fn playlists(&self) -> Vec<Playlist>;
}

/// Source of wall-clock time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}
