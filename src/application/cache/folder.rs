// SPDX-License-Identifier: MPL-2.0
//! Folder-identity cache.
//!
//! Remembers which media files live under a picked folder so repeated scans
//! skip the directory walk. An entry is valid while it is younger than the
//! validity window *and* no image or video under the folder was modified
//! after the time recorded at save.

use super::key::{folder_key, FOLDER_NAMESPACE, FOLDER_TREE_NAMESPACE};
use super::{evict_expired_in, load_entry, window_millis, CacheEntry};
use crate::application::port::{probe_latest_media_change, Clock, KeyValueStore, ModificationProbe};
use crate::domain::media::MediaItem;
use crate::error::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Default folder cache validity (30 days).
pub const DEFAULT_FOLDER_VALIDITY: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Cache of per-folder media listings with modification-time staleness checks.
#[derive(Clone)]
pub struct FolderCache {
    store: Arc<dyn KeyValueStore>,
    probe: Arc<dyn ModificationProbe>,
    clock: Arc<dyn Clock>,
    validity_millis: i64,
}

impl std::fmt::Debug for FolderCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderCache")
            .field("validity_millis", &self.validity_millis)
            .finish_non_exhaustive()
    }
}

impl FolderCache {
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        probe: Arc<dyn ModificationProbe>,
        clock: Arc<dyn Clock>,
        validity: Duration,
    ) -> Self {
        Self {
            store,
            probe,
            clock,
            validity_millis: window_millis(validity),
        }
    }

    /// Key for a folder source; recursive and flat listings are kept apart.
    #[must_use]
    pub fn key_for(identifier: &str, recursive: bool) -> String {
        let namespace = if recursive {
            FOLDER_TREE_NAMESPACE
        } else {
            FOLDER_NAMESPACE
        };
        folder_key(namespace, identifier)
    }

    /// Returns the cached entry if it is still valid.
    ///
    /// Expired entries are reported as a miss without probing storage.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let entry = load_entry(self.store.as_ref(), key)?;
        if self.is_valid(&entry) {
            tracing::debug!(key, count = entry.count, "folder cache hit");
            Some(entry)
        } else {
            None
        }
    }

    /// Age check first, then two cheap modification probes.
    #[must_use]
    pub fn is_valid(&self, entry: &CacheEntry) -> bool {
        if entry.is_expired(self.clock.now_millis(), self.validity_millis) {
            tracing::debug!(key = %entry.key, "folder cache entry expired");
            return false;
        }
        let Some(prefix) = entry.prefix.as_deref() else {
            return true;
        };
        let probed = probe_latest_media_change(self.probe.as_ref(), Path::new(prefix));
        if probed > entry.storage_modified_at {
            tracing::debug!(
                key = %entry.key,
                probed,
                recorded = entry.storage_modified_at,
                "folder changed since cache was written"
            );
            return false;
        }
        true
    }

    /// Replaces the entry for `key`.
    ///
    /// The modification time is probed here rather than taken from the
    /// caller, so it is never older than any file the scan could have seen.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be encoded or written.
    pub fn put(&self, key: &str, folder: &Path, items: &[MediaItem]) -> Result<()> {
        let storage_modified_at = probe_latest_media_change(self.probe.as_ref(), folder);
        let entry = CacheEntry::new(key, items, self.clock.now_millis(), storage_modified_at)
            .with_prefix(folder.to_string_lossy());
        self.store.put(key, &entry.encode()?)?;
        tracing::debug!(key, count = entry.count, "folder cache written");
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

    /// Drops every folder entry older than the validity window.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be enumerated or written.
    pub fn evict_expired(&self) -> Result<usize> {
        let now = self.clock.now_millis();
        Ok(
            evict_expired_in(self.store.as_ref(), FOLDER_NAMESPACE, now, self.validity_millis)?
                + evict_expired_in(
                    self.store.as_ref(),
                    FOLDER_TREE_NAMESPACE,
                    now,
                    self.validity_millis,
                )?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::media::MediaType;
    use crate::infrastructure::store::MemoryStore;
    use std::io;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    #[derive(Default)]
    struct FakeClock(AtomicI64);

    impl Clock for FakeClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct FakeProbe {
        latest: AtomicI64,
        calls: AtomicUsize,
    }

    impl ModificationProbe for FakeProbe {
        fn latest_modified(&self, _prefix: &Path, _kind: MediaType) -> io::Result<Option<i64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(self.latest.load(Ordering::SeqCst)))
        }
    }

    struct Fixture {
        cache: FolderCache,
        store: Arc<MemoryStore>,
        clock: Arc<FakeClock>,
        probe: Arc<FakeProbe>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FakeClock::default());
        let probe = Arc::new(FakeProbe::default());
        clock.0.store(100 * DAY_MS, Ordering::SeqCst);
        probe.latest.store(50 * DAY_MS, Ordering::SeqCst);
        let cache = FolderCache::new(
            store.clone(),
            probe.clone(),
            clock.clone(),
            DEFAULT_FOLDER_VALIDITY,
        );
        Fixture {
            cache,
            store,
            clock,
            probe,
        }
    }

    fn items() -> Vec<MediaItem> {
        vec![MediaItem::new("/p/a.jpg"), MediaItem::new("/p/b.mp4")]
    }

    #[test]
    fn put_then_get_returns_identical_items() {
        let f = fixture();
        let key = FolderCache::key_for("/p", false);
        f.cache.put(&key, Path::new("/p"), &items()).expect("put");

        let entry = f.cache.get(&key).expect("hit");
        assert_eq!(entry.media_items(), items());
        assert_eq!(entry.storage_modified_at, 50 * DAY_MS);
    }

    #[test]
    fn newer_modification_makes_entry_stale() {
        let f = fixture();
        let key = FolderCache::key_for("/p", false);
        f.cache.put(&key, Path::new("/p"), &items()).expect("put");

        f.probe.latest.store(50 * DAY_MS + 1, Ordering::SeqCst);
        assert!(f.cache.get(&key).is_none());
    }

    #[test]
    fn expired_entry_misses_without_probing() {
        let f = fixture();
        let key = FolderCache::key_for("/p", true);
        f.cache.put(&key, Path::new("/p"), &items()).expect("put");
        let probes_after_put = f.probe.calls.load(Ordering::SeqCst);

        f.clock.0.fetch_add(31 * DAY_MS, Ordering::SeqCst);
        assert!(f.cache.get(&key).is_none());
        assert_eq!(f.probe.calls.load(Ordering::SeqCst), probes_after_put);
    }

    #[test]
    fn entry_aged_31_days_is_invalid_regardless_of_modification() {
        let f = fixture();
        let now = f.clock.now_millis();
        let entry = CacheEntry::new("k", &items(), now - 31 * DAY_MS, i64::MAX).with_prefix("/p");
        assert!(!f.cache.is_valid(&entry));
    }

    #[test]
    fn put_reprobes_modification_time() {
        let f = fixture();
        let key = FolderCache::key_for("/p", false);
        f.cache.put(&key, Path::new("/p"), &items()).expect("put");
        f.probe.latest.store(60 * DAY_MS, Ordering::SeqCst);
        f.cache.put(&key, Path::new("/p"), &items()).expect("put");

        let entry = f.cache.get(&key).expect("hit");
        assert_eq!(entry.storage_modified_at, 60 * DAY_MS);
    }

    #[test]
    fn corrupt_record_is_a_miss() {
        let f = fixture();
        f.store.put("folder_local_deadbeef", b"\xff\x00junk").expect("put");
        assert!(f.cache.get("folder_local_deadbeef").is_none());
    }

    #[test]
    fn invalidate_removes_entry() {
        let f = fixture();
        let key = FolderCache::key_for("/p", false);
        f.cache.put(&key, Path::new("/p"), &items()).expect("put");
        f.cache.invalidate(&key).expect("invalidate");
        assert!(f.cache.get(&key).is_none());
    }

    #[test]
    fn evict_expired_only_touches_old_folder_entries() {
        let f = fixture();
        let old = FolderCache::key_for("/old", false);
        let fresh = FolderCache::key_for("/fresh", true);
        f.cache.put(&old, Path::new("/old"), &items()).expect("put");
        f.clock.0.fetch_add(20 * DAY_MS, Ordering::SeqCst);
        f.cache.put(&fresh, Path::new("/fresh"), &items()).expect("put");
        f.store.put("playlist_abc", b"unrelated").expect("put");
        f.clock.0.fetch_add(15 * DAY_MS, Ordering::SeqCst);

        assert_eq!(f.cache.evict_expired().expect("evict"), 1);
        assert!(f.store.get(&old).expect("get").is_none());
        assert!(f.store.get(&fresh).expect("get").is_some());
        assert!(f.store.get("playlist_abc").expect("get").is_some());
    }
}
