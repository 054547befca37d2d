// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`scanner`]: Streaming, cancellable source walker
//! - [`cache`]: Folder-listing and playlist-result caches
//! - [`navigation`]: Working set, history and random selection
//! - [`loader`]: Playlist loading across the three
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The CLI wires concrete adapters into these services
//!
//! # Example
//!
//! ```no_run
//! use media_deck::application::cache::{PlaylistCache, DEFAULT_PLAYLIST_VALIDITY};
//! use media_deck::application::loader::PlaylistLoader;
//! use media_deck::application::navigation::NavigationEngine;
//! use media_deck::application::scanner::Scanner;
//! use media_deck::domain::media::MediaFilter;
//! use media_deck::domain::playlist::{Playlist, Source};
//! use media_deck::infrastructure::{FsPathResolver, MemoryStore, SystemClock};
//! use std::sync::Arc;
//!
//! # async fn run() -> media_deck::error::Result<()> {
//! let scanner = Scanner::new(Arc::new(FsPathResolver::new()));
//! let cache = PlaylistCache::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(SystemClock),
//!     DEFAULT_PLAYLIST_VALIDITY,
//! );
//! let loader = PlaylistLoader::new(scanner, cache, Arc::new(NavigationEngine::new()));
//!
//! let playlist = Playlist::new(
//!     "photos",
//!     vec![Source::folder("/home/me/Pictures", true)],
//!     MediaFilter::PhotosOnly,
//! );
//! loader.load_playlist(&playlist, false).await?;
//! let shown = loader.engine().next();
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod loader;
pub mod navigation;
pub mod port;
pub mod scanner;
