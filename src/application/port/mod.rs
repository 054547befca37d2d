// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the application layer remains
//! independent of concrete implementations.
//!
//! # Available Ports
//!
//! - [`storage`]: Identifier resolution and modification-time probing
//! - [`store`]: Key-value persistence, playlist definitions and the clock
//!
//! # Design Notes
//!
//! - Traits are `Send + Sync`: scans and probes run on blocking worker threads
//! - No `async fn`: adapters are called from `spawn_blocking` contexts
//!
//! # Example
//!
//! ```
//! use media_deck::application::port::PathResolver;
//! use std::path::PathBuf;
//!
//! let resolver = |id: &str| Some(PathBuf::from(id));
//! assert_eq!(resolver.resolve("/photos"), Some(PathBuf::from("/photos")));
//! ```

pub mod storage;
pub mod store;

// Re-export main types for convenience
pub use storage::{probe_latest_media_change, ModificationProbe, PathResolver};
pub use store::{Clock, KeyValueStore, PlaylistRepository};
