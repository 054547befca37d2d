// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`fs`]: Identifier resolution and modification probing on the local filesystem
//! - [`store`]: File-backed and in-memory key-value stores
//! - [`playlists`]: Playlist definitions read from `playlists.toml`
//! - [`clock`]: System clock

pub mod clock;
pub mod fs;
pub mod playlists;
pub mod store;

// Re-export main types for convenience
pub use clock::SystemClock;
pub use fs::{FsModificationProbe, FsPathResolver};
pub use playlists::TomlPlaylistRepository;
pub use store::{FileStore, MemoryStore};
