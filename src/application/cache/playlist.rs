// SPDX-License-Identifier: MPL-2.0
//! Playlist-result cache.
//!
//! Holds the complete item list of a playlist load. A playlist can span
//! unrelated sources, so there is no aggregate modification probe: validity
//! is decided by age alone.

use super::key::{playlist_key, PLAYLIST_NAMESPACE};
use super::{evict_expired_in, load_entry, window_millis, CacheEntry};
use crate::application::port::{Clock, KeyValueStore};
use crate::domain::media::MediaItem;
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;

/// Default playlist cache validity (30 minutes).
pub const DEFAULT_PLAYLIST_VALIDITY: Duration = Duration::from_secs(30 * 60);

#[derive(Clone)]
pub struct PlaylistCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    validity_millis: i64,
}

impl std::fmt::Debug for PlaylistCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistCache")
            .field("validity_millis", &self.validity_millis)
            .finish_non_exhaustive()
    }
}

impl PlaylistCache {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, validity: Duration) -> Self {
        Self {
            store,
            clock,
            validity_millis: window_millis(validity),
        }
    }

    #[must_use]
    pub fn key_for(playlist_id: &str) -> String {
        playlist_key(playlist_id)
    }

    /// Returns the cached entry if it is younger than the validity window.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let entry = load_entry(self.store.as_ref(), key)?;
        if self.is_valid(&entry) {
            tracing::debug!(key, count = entry.count, "playlist cache hit");
            Some(entry)
        } else {
            tracing::debug!(key, "playlist cache entry expired");
            None
        }
    }

    #[must_use]
    pub fn is_valid(&self, entry: &CacheEntry) -> bool {
        !entry.is_expired(self.clock.now_millis(), self.validity_millis)
    }

    /// Replaces the entry for `key` with `items`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be encoded or written.
    pub fn put(&self, key: &str, items: &[MediaItem]) -> Result<()> {
        let now = self.clock.now_millis();
        let entry = CacheEntry::new(key, items, now, now);
        self.store.put(key, &entry.encode()?)?;
        tracing::debug!(key, count = entry.count, "playlist cache written");
        Ok(())
    }

    /// Removes the entry for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn invalidate(&self, key: &str) -> Result<()> {
        self.store.remove(key)
    }

    /// Drops every playlist entry older than the validity window.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be enumerated or written.
    pub fn evict_expired(&self) -> Result<usize> {
        evict_expired_in(
            self.store.as_ref(),
            PLAYLIST_NAMESPACE,
            self.clock.now_millis(),
            self.validity_millis,
        )
    }
}
