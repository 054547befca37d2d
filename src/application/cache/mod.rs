// SPDX-License-Identifier: MPL-2.0
//! Scan result caches.
//!
//! Two independent caches with different horizons and staleness strategies:
//!
//! - [`FolderCache`]: which media files exist under one folder source. Valid
//!   for 30 days and dropped as soon as storage reports a file newer than the
//!   entry's recorded modification time.
//! - [`PlaylistCache`]: the complete result of a multi-source playlist scan.
//!   Valid for 30 minutes, judged by age alone.
//!
//! They live in separate key namespaces and must not share a validity policy.

pub mod entry;
pub mod folder;
pub mod key;
pub mod playlist;

pub use entry::CacheEntry;
pub use folder::{FolderCache, DEFAULT_FOLDER_VALIDITY};
pub use playlist::{PlaylistCache, DEFAULT_PLAYLIST_VALIDITY};

use crate::application::port::KeyValueStore;
use std::time::Duration;

/// Converts a validity window to milliseconds, saturating.
pub(crate) fn window_millis(window: Duration) -> i64 {
    i64::try_from(window.as_millis()).unwrap_or(i64::MAX)
}

/// Reads and decodes `key`, mapping backend errors and corrupt records to a miss.
pub(crate) fn load_entry(store: &dyn KeyValueStore, key: &str) -> Option<CacheEntry> {
    let bytes = match store.get(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return None,
        Err(error) => {
            tracing::warn!(key, %error, "cache store read failed, treating as miss");
            return None;
        }
    };

    let entry = CacheEntry::decode(&bytes);
    if entry.is_none() {
        tracing::debug!(key, "cache entry unreadable, treating as miss");
    }
    entry.filter(|entry| entry.key == key)
}

/// Removes every entry in `namespace` that is older than `validity_millis`.
///
/// Returns how many entries were evicted. Unreadable entries are evicted too.
pub(crate) fn evict_expired_in(
    store: &dyn KeyValueStore,
    namespace: &str,
    now: i64,
    validity_millis: i64,
) -> crate::error::Result<usize> {
    let prefix = format!("{namespace}_");
    let mut evicted = 0;
    for key in store.keys()? {
        if !key.starts_with(&prefix) {
            continue;
        }
        let expired = load_entry(store, &key).is_none_or(|e| e.is_expired(now, validity_millis));
        if expired {
            store.remove(&key)?;
            evicted += 1;
        }
    }
    Ok(evicted)
}
