// SPDX-License-Identifier: MPL-2.0
use media_deck::application::cache::{FolderCache, PlaylistCache};
use media_deck::application::loader::{LoadOutcome, PlaylistLoader};
use media_deck::application::navigation::NavigationEngine;
use media_deck::application::port::KeyValueStore;
use media_deck::application::scanner::Scanner;
use media_deck::config::{self, Config, SortOrder};
use media_deck::domain::media::{MediaFilter, MediaItem};
use media_deck::domain::playlist::{Playlist, Source};
use media_deck::infrastructure::{
    FileStore, FsModificationProbe, FsPathResolver, SystemClock, TomlPlaylistRepository,
};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn write_media(dir: &Path, names: &[&str]) {
    for name in names {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create directory");
        }
        fs::write(path, b"fake media data").expect("failed to write media file");
    }
}

/// Wires the loader the way the CLI does, persisting caches under `cache_dir`.
fn file_backed_loader(cache_dir: &Path, config: &Config, seed: u64) -> PlaylistLoader {
    let store: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::open(cache_dir).expect("failed to open store"));
    let folder_cache = FolderCache::new(
        Arc::clone(&store),
        Arc::new(FsModificationProbe),
        Arc::new(SystemClock),
        config.folder_cache_validity(),
    );
    let playlist_cache =
        PlaylistCache::new(store, Arc::new(SystemClock), config.playlist_cache_validity());
    let scanner = Scanner::new(Arc::new(FsPathResolver::with_volumes(config.volumes.clone())))
        .with_folder_cache(folder_cache)
        .with_batch_size(config.batch_size());
    PlaylistLoader::new(scanner, playlist_cache, Arc::new(NavigationEngine::with_seed(seed)))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn recursive_playlist_loads_and_navigates() {
    let media = tempdir().expect("failed to create temp dir");
    let cache = tempdir().expect("failed to create temp dir");
    let mut names: Vec<String> = (0..120).map(|i| format!("day{}/img_{i:03}.jpg", i % 3)).collect();
    names.push("day0/clip.mp4".into());
    names.push("day1/readme.txt".into());
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    write_media(media.path(), &refs);

    let loader = file_backed_loader(cache.path(), &Config::default(), 11);
    let playlist = Playlist::new(
        "trip",
        vec![Source::folder(media.path().to_string_lossy(), true)],
        MediaFilter::PhotosOnly,
    );

    let outcome = loader.load_playlist(&playlist, false).await.expect("load");
    assert_eq!(outcome, LoadOutcome::Scanned { count: 120 });

    let engine = loader.engine();
    let first = engine.current().expect("first item auto-selected");
    assert_eq!(engine.items()[0], first);

    // Walk forward, then back to the start, then wrap.
    let mut visited = vec![first.clone()];
    for _ in 0..10 {
        visited.push(engine.next().expect("next item"));
    }
    for expected in visited.iter().rev().skip(1) {
        assert_eq!(engine.previous().as_ref(), Some(expected));
    }
    assert_eq!(engine.previous().as_ref(), visited.last());

    // With 120 items the recency window is 50, so no immediate repeats are expected.
    let unique: HashSet<&MediaItem> = visited.iter().collect();
    assert_eq!(unique.len(), visited.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn caches_persist_across_loaders() {
    let media = tempdir().expect("failed to create temp dir");
    let cache = tempdir().expect("failed to create temp dir");
    write_media(media.path(), &["a.jpg", "b.png", "c.mov"]);
    let playlist = Playlist::new(
        "mixed",
        vec![
            Source::folder(media.path().to_string_lossy(), false),
            Source::file("/external/poster.jpg"),
        ],
        MediaFilter::Mixed,
    );

    let first = file_backed_loader(cache.path(), &Config::default(), 1);
    let scanned = first.load_playlist(&playlist, false).await.expect("first load");
    assert_eq!(scanned, LoadOutcome::Scanned { count: 4 });

    let records = fs::read_dir(cache.path()).expect("cache dir").count();
    assert_eq!(records, 2, "one folder entry and one playlist entry");

    let second = file_backed_loader(cache.path(), &Config::default(), 1);
    let cached = second.load_playlist(&playlist, false).await.expect("second load");
    assert_eq!(cached, LoadOutcome::CacheHit { count: 4 });
    assert_eq!(second.engine().items(), first.engine().items());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn playlists_file_drives_loading() {
    let media = tempdir().expect("failed to create temp dir");
    let config_dir = tempdir().expect("failed to create temp dir");
    let cache = tempdir().expect("failed to create temp dir");
    write_media(media.path(), &["b.jpg", "a.jpg", "c.mkv"]);

    let playlists_path = config_dir.path().join("playlists.toml");
    TomlPlaylistRepository::save_to_path(
        &[Playlist::new(
            "stills",
            vec![Source::folder(media.path().to_string_lossy(), false)],
            MediaFilter::PhotosOnly,
        )],
        &playlists_path,
    )
    .expect("save playlists");

    let mut config = Config::default();
    config.sort_order = Some(SortOrder::ReverseAlphabetical);
    config::save_with_override(&config, Some(config_dir.path().to_path_buf())).expect("save config");
    let (config, warning) = config::load_with_override(Some(config_dir.path().to_path_buf()));
    assert!(warning.is_none());

    let repository =
        TomlPlaylistRepository::load_from_path(&playlists_path).expect("load playlists");
    let loader = file_backed_loader(cache.path(), &config, 2).with_repository(Arc::new(repository));
    let settings = config::Settings::new(config);
    let _task = loader.follow_settings(&settings);

    let outcome = loader.load_playlist_by_id("stills", false).await.expect("load");
    assert_eq!(outcome.count(), 2);

    let names: Vec<String> = loader
        .engine()
        .ordered_items()
        .iter()
        .map(MediaItem::display_name)
        .collect();
    assert_eq!(names, vec!["b.jpg", "a.jpg"]);
}
