// SPDX-License-Identifier: MPL-2.0
//! Playlist loading.
//!
//! [`PlaylistLoader`] ties the scanner, the playlist-result cache and the
//! navigation engine together. A load either replays a valid cached result in
//! one append, or streams scan batches into the engine as they arrive and
//! records the full result once the scan completes.
//!
//! Only one load is active at a time. Starting a load for another playlist
//! cancels the running scan, and batches from a superseded load are dropped
//! instead of appended. Consumers observe the growing list through
//! [`NavigationEngine::subscribe_items`].

use crate::application::cache::PlaylistCache;
use crate::application::navigation::NavigationEngine;
use crate::application::port::PlaylistRepository;
use crate::application::scanner::{
    self, cancellation_token, CancellationToken, ScanOutcome, Scanner,
};
use crate::config::Settings;
use crate::domain::media::MediaItem;
use crate::domain::playlist::Playlist;
use crate::error::{Error, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::task::JoinHandle;

/// How a load request was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The playlist is already resident; nothing changed.
    Suppressed,
    /// The working set was filled from the playlist-result cache.
    CacheHit { count: usize },
    /// The working set was filled by a scan.
    Scanned { count: usize },
}

impl LoadOutcome {
    /// Number of items loaded, zero when suppressed.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Suppressed => 0,
            Self::CacheHit { count } | Self::Scanned { count } => *count,
        }
    }
}

#[derive(Debug, Default)]
struct ActiveLoad {
    playlist_id: Option<String>,
    generation: u64,
    in_flight: bool,
    cancel: Option<CancellationToken>,
}

/// Loads playlists into a shared [`NavigationEngine`].
pub struct PlaylistLoader {
    scanner: Scanner,
    cache: PlaylistCache,
    engine: Arc<NavigationEngine>,
    repository: Option<Arc<dyn PlaylistRepository>>,
    active: Mutex<ActiveLoad>,
}

impl std::fmt::Debug for PlaylistLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistLoader")
            .field("scanner", &self.scanner)
            .field("cache", &self.cache)
            .field("active", &self.lock_active().playlist_id)
            .finish_non_exhaustive()
    }
}

impl PlaylistLoader {
    #[must_use]
    pub fn new(scanner: Scanner, cache: PlaylistCache, engine: Arc<NavigationEngine>) -> Self {
        Self {
            scanner,
            cache,
            engine,
            repository: None,
            active: Mutex::new(ActiveLoad::default()),
        }
    }

    /// Enables [`PlaylistLoader::load_playlist_by_id`].
    #[must_use]
    pub fn with_repository(mut self, repository: Arc<dyn PlaylistRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<NavigationEngine> {
        &self.engine
    }

    /// Identifier of the playlist most recently loaded or loading.
    #[must_use]
    pub fn current_playlist(&self) -> Option<String> {
        self.lock_active().playlist_id.clone()
    }

    fn lock_active(&self) -> MutexGuard<'_, ActiveLoad> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks `playlist_id` up in the repository and loads it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PlaylistNotFound`] if no repository is configured or it
    /// has no such playlist, and [`Error::Cancelled`] if a newer load supersedes
    /// this one.
    pub async fn load_playlist_by_id(
        &self,
        playlist_id: &str,
        force_refresh: bool,
    ) -> Result<LoadOutcome> {
        let playlist = self
            .repository
            .as_ref()
            .and_then(|repository| repository.playlist(playlist_id))
            .ok_or_else(|| Error::PlaylistNotFound(playlist_id.to_string()))?;
        self.load_playlist(&playlist, force_refresh).await
    }

    /// Loads `playlist` into the engine.
    ///
    /// A request for the playlist that is already resident (or still loading)
    /// is suppressed unless `force_refresh` is set or the working set is empty.
    /// Otherwise the engine is reset, then filled from the playlist cache when
    /// valid and `force_refresh` is unset, or by scanning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if a newer load supersedes this one before
    /// it finishes. Items already appended stay appended only until that load
    /// resets the engine.
    pub async fn load_playlist(&self, playlist: &Playlist, force_refresh: bool) -> Result<LoadOutcome> {
        let Some((generation, cancel)) = self.begin(playlist, force_refresh) else {
            tracing::debug!(playlist = %playlist.id, "playlist already resident, load suppressed");
            return Ok(LoadOutcome::Suppressed);
        };

        let key = PlaylistCache::key_for(&playlist.id);
        if !force_refresh {
            if let Some(entry) = self.cache.get(&key) {
                let items = entry.media_items();
                let count = items.len();
                if !self.append_if_current(generation, items) {
                    return Err(Error::Cancelled);
                }
                self.finish(generation);
                tracing::info!(playlist = %playlist.id, count, "playlist served from cache");
                return Ok(LoadOutcome::CacheHit { count });
            }
        }

        let started = Instant::now();
        let mut stream =
            self.scanner
                .scan_with_token(playlist.sources.clone(), playlist.filter, cancel);
        let mut collected: Vec<MediaItem> = Vec::new();

        while let Some(batch) = stream.next_batch().await {
            collected.extend(batch.iter().cloned());
            if !self.append_if_current(generation, batch) {
                stream.cancel();
                tracing::debug!(playlist = %playlist.id, "superseded load dropped a late batch");
                return Err(Error::Cancelled);
            }
        }

        match stream.outcome().await {
            ScanOutcome::Completed { total } => {
                if !self.finish(generation) {
                    return Err(Error::Cancelled);
                }
                if !collected.is_empty() {
                    if let Err(error) = self.cache.put(&key, &collected) {
                        tracing::warn!(playlist = %playlist.id, %error, "failed to cache playlist result");
                    }
                }
                tracing::info!(
                    playlist = %playlist.id,
                    count = total,
                    elapsed_ms = started.elapsed().as_millis(),
                    "playlist scanned"
                );
                Ok(LoadOutcome::Scanned { count: total })
            }
            ScanOutcome::Cancelled => {
                tracing::debug!(playlist = %playlist.id, "playlist scan cancelled");
                Err(Error::Cancelled)
            }
        }
    }

    /// Cancels the running load, if any. Items already appended remain.
    pub fn cancel_current(&self) {
        let mut active = self.lock_active();
        if let Some(cancel) = active.cancel.take() {
            cancel.store(true, std::sync::atomic::Ordering::SeqCst);
        }
        active.generation += 1;
        active.in_flight = false;
    }

    /// Applies the sort order from `settings` now and on every change.
    ///
    /// The task ends when every [`Settings`] handle is dropped. Must be called
    /// from within a Tokio runtime.
    pub fn follow_settings(&self, settings: &Settings) -> JoinHandle<()> {
        let engine = Arc::clone(&self.engine);
        let mut rx = settings.subscribe();
        engine.set_sort_order(rx.borrow_and_update().sort_order());
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let sort_order = rx.borrow_and_update().sort_order();
                tracing::debug!(?sort_order, "sort order changed");
                engine.set_sort_order(sort_order);
            }
        })
    }

    /// Claims the active slot for `playlist`, or returns `None` if suppressed.
    fn begin(&self, playlist: &Playlist, force_refresh: bool) -> Option<(u64, CancellationToken)> {
        let mut active = self.lock_active();
        let resident = active.playlist_id.as_deref() == Some(playlist.id.as_str());
        if resident && !force_refresh && (active.in_flight || !self.engine.is_empty()) {
            return None;
        }

        if let Some(previous) = active.cancel.take() {
            if !scanner::is_cancelled(&previous) {
                tracing::debug!(previous = ?active.playlist_id, "cancelling previous load");
            }
            previous.store(true, std::sync::atomic::Ordering::SeqCst);
        }

        let cancel = cancellation_token();
        active.generation += 1;
        active.playlist_id = Some(playlist.id.clone());
        active.in_flight = true;
        active.cancel = Some(Arc::clone(&cancel));
        self.engine.reset();
        Some((active.generation, cancel))
    }

    /// Appends `items` unless a newer load has started.
    fn append_if_current(&self, generation: u64, items: Vec<MediaItem>) -> bool {
        let active = self.lock_active();
        if active.generation != generation {
            return false;
        }
        self.engine.append(items);
        true
    }

    /// Marks the load finished. Returns `false` if it was superseded.
    fn finish(&self, generation: u64) -> bool {
        let mut active = self.lock_active();
        if active.generation != generation {
            return false;
        }
        active.in_flight = false;
        active.cancel = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cache::DEFAULT_PLAYLIST_VALIDITY;
    use crate::application::port::KeyValueStore;
    use crate::config::SortOrder;
    use crate::domain::media::MediaFilter;
    use crate::domain::playlist::Source;
    use crate::infrastructure::fs::FsPathResolver;
    use crate::infrastructure::playlists::TomlPlaylistRepository;
    use crate::infrastructure::store::MemoryStore;
    use crate::infrastructure::SystemClock;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::tempdir;

    fn create_files(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"fake media data").expect("failed to write test file");
        }
    }

    fn loader_with_store(store: Arc<MemoryStore>) -> PlaylistLoader {
        let scanner = Scanner::new(Arc::new(FsPathResolver::new()));
        let cache = PlaylistCache::new(store, Arc::new(SystemClock), DEFAULT_PLAYLIST_VALIDITY);
        PlaylistLoader::new(scanner, cache, Arc::new(NavigationEngine::with_seed(3)))
    }

    fn folder_playlist(id: &str, dir: &Path) -> Playlist {
        Playlist::new(
            id,
            vec![Source::folder(dir.to_string_lossy(), false)],
            MediaFilter::Mixed,
        )
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn scan_fills_engine_and_caches_result() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        create_files(temp_dir.path(), &["a.jpg", "b.mp4", "c.txt"]);
        let store = Arc::new(MemoryStore::new());
        let loader = loader_with_store(Arc::clone(&store));
        let playlist = folder_playlist("holiday", temp_dir.path());

        let outcome = loader.load_playlist(&playlist, false).await.expect("load");
        assert_eq!(outcome, LoadOutcome::Scanned { count: 2 });
        assert_eq!(loader.engine().len(), 2);
        assert_eq!(
            loader.engine().current().map(|item| item.display_name()),
            Some("a.jpg".to_string())
        );

        let key = PlaylistCache::key_for("holiday");
        assert!(store.get(&key).expect("get").is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn second_load_of_resident_playlist_is_suppressed() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        create_files(temp_dir.path(), &["a.jpg"]);
        let loader = loader_with_store(Arc::new(MemoryStore::new()));
        let playlist = folder_playlist("p", temp_dir.path());

        loader.load_playlist(&playlist, false).await.expect("first load");
        loader.engine().next();
        let history = loader.engine().history_len();

        let outcome = loader.load_playlist(&playlist, false).await.expect("second load");
        assert_eq!(outcome, LoadOutcome::Suppressed);
        assert_eq!(loader.engine().history_len(), history);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn valid_cache_replaces_scan() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        create_files(temp_dir.path(), &["a.jpg", "b.png"]);
        let store = Arc::new(MemoryStore::new());
        let playlist = folder_playlist("p", temp_dir.path());

        let first = loader_with_store(Arc::clone(&store));
        first.load_playlist(&playlist, false).await.expect("first load");

        // New files are invisible until the 30 minute window passes or a refresh is forced.
        create_files(temp_dir.path(), &["c.gif"]);
        let second = loader_with_store(Arc::clone(&store));
        let outcome = second.load_playlist(&playlist, false).await.expect("cached load");
        assert_eq!(outcome, LoadOutcome::CacheHit { count: 2 });

        let forced = second.load_playlist(&playlist, true).await.expect("forced load");
        assert_eq!(forced, LoadOutcome::Scanned { count: 3 });
        assert_eq!(second.engine().len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn empty_result_is_not_cached() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        create_files(temp_dir.path(), &["notes.txt"]);
        let store = Arc::new(MemoryStore::new());
        let loader = loader_with_store(Arc::clone(&store));

        let outcome = loader
            .load_playlist(&folder_playlist("empty", temp_dir.path()), false)
            .await
            .expect("load");
        assert_eq!(outcome, LoadOutcome::Scanned { count: 0 });
        assert!(store.keys().expect("keys").is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn switching_playlists_resets_the_working_set() {
        let first_dir = tempdir().expect("failed to create temp dir");
        let second_dir = tempdir().expect("failed to create temp dir");
        create_files(first_dir.path(), &["a.jpg", "b.jpg"]);
        create_files(second_dir.path(), &["z.mp4"]);
        let loader = loader_with_store(Arc::new(MemoryStore::new()));

        loader
            .load_playlist(&folder_playlist("one", first_dir.path()), false)
            .await
            .expect("first");
        loader
            .load_playlist(&folder_playlist("two", second_dir.path()), false)
            .await
            .expect("second");

        assert_eq!(loader.current_playlist().as_deref(), Some("two"));
        assert_eq!(loader.engine().len(), 1);
        assert_eq!(
            loader.engine().current().map(|item| item.display_name()),
            Some("z.mp4".to_string())
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn superseded_load_reports_cancellation() {
        let big_dir = tempdir().expect("failed to create temp dir");
        for i in 0..600 {
            fs::write(big_dir.path().join(format!("{i:04}.jpg")), b"x").expect("write");
        }
        let small_dir = tempdir().expect("failed to create temp dir");
        create_files(small_dir.path(), &["only.png"]);

        let loader = Arc::new(loader_with_store(Arc::new(MemoryStore::new())));
        let mut count = loader.engine().subscribe_count();
        let slow = {
            let loader = Arc::clone(&loader);
            let playlist = folder_playlist("big", big_dir.path());
            tokio::spawn(async move { loader.load_playlist(&playlist, false).await })
        };

        // Wait for the first batch so the big load is known to be in flight.
        count
            .wait_for(|&len| len > 0)
            .await
            .expect("engine alive");
        let fast = loader
            .load_playlist(&folder_playlist("small", small_dir.path()), false)
            .await
            .expect("small load");
        assert_eq!(fast, LoadOutcome::Scanned { count: 1 });

        // The big load either finished before the switch or was superseded.
        match slow.await.expect("task panicked") {
            Ok(LoadOutcome::Scanned { count }) => assert_eq!(count, 600),
            Err(error) => assert!(error.is_cancelled()),
            Ok(other) => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(loader.engine().len(), 1);
    }

    #[tokio::test]
    async fn unknown_playlist_id_is_an_error() {
        let loader = loader_with_store(Arc::new(MemoryStore::new()))
            .with_repository(Arc::new(TomlPlaylistRepository::default()));
        let result = loader.load_playlist_by_id("missing", false).await;
        assert!(matches!(result, Err(Error::PlaylistNotFound(id)) if id == "missing"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn load_by_id_reads_repository() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        create_files(temp_dir.path(), &["a.webm", "b.jpg"]);
        let repository = TomlPlaylistRepository::from_playlists(vec![Playlist::new(
            "clips",
            vec![Source::folder(temp_dir.path().to_string_lossy(), false)],
            MediaFilter::VideoOnly,
        )]);
        let loader = loader_with_store(Arc::new(MemoryStore::new()))
            .with_repository(Arc::new(repository));

        let outcome = loader.load_playlist_by_id("clips", false).await.expect("load");
        assert_eq!(outcome.count(), 1);
    }

    #[tokio::test]
    async fn settings_changes_reorder_the_view() {
        let loader = loader_with_store(Arc::new(MemoryStore::new()));
        loader.engine().append(vec![MediaItem::from("/b.jpg"), MediaItem::from("/a.jpg")]);
        let settings = Settings::default();
        let task = loader.follow_settings(&settings);

        let mut view = loader.engine().subscribe_items();
        settings.set_sort_order(SortOrder::Alphabetical);
        tokio::time::timeout(
            Duration::from_secs(5),
            view.wait_for(|items| items.first().is_some_and(|item| item.identifier() == "/a.jpg")),
        )
        .await
        .expect("view reordered in time")
        .expect("engine alive");

        assert_eq!(loader.engine().current().map(|i| i.identifier().to_string()), Some("/b.jpg".into()));
        drop(settings);
        task.await.expect("settings task panicked");
    }
}
