// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Folder Cache**: validity window of cached folder listings
//! - **Playlist Cache**: validity window of cached playlist results
//! - **Scan**: batch size of streamed scan results

// ==========================================================================
// Folder Cache Defaults
// ==========================================================================

/// Default validity of a cached folder listing (in days).
pub const DEFAULT_FOLDER_CACHE_DAYS: u32 = 30;

/// Minimum folder cache validity (in days).
pub const MIN_FOLDER_CACHE_DAYS: u32 = 1;

/// Maximum folder cache validity (in days).
pub const MAX_FOLDER_CACHE_DAYS: u32 = 365;

// ==========================================================================
// Playlist Cache Defaults
// ==========================================================================

/// Default validity of a cached playlist result (in minutes).
pub const DEFAULT_PLAYLIST_CACHE_MINUTES: u32 = 30;

/// Minimum playlist cache validity (in minutes).
pub const MIN_PLAYLIST_CACHE_MINUTES: u32 = 1;

/// Maximum playlist cache validity (in minutes). One week.
pub const MAX_PLAYLIST_CACHE_MINUTES: u32 = 7 * 24 * 60;

// ==========================================================================
// Scan Defaults
// ==========================================================================

/// Default number of items per streamed batch.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Minimum batch size.
pub const MIN_BATCH_SIZE: usize = 1;

/// Maximum batch size.
pub const MAX_BATCH_SIZE: usize = 10_000;
