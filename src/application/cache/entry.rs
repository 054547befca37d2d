// SPDX-License-Identifier: MPL-2.0
//! Persisted cache record.
//!
//! One flat record per key, CBOR-encoded. A record that fails to decode is a
//! cache miss, never an error.

use crate::domain::media::MediaItem;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A cached scan result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    /// Item identifiers in discovery order.
    pub items: Vec<String>,
    /// When the scan that produced `items` finished (epoch ms).
    pub last_scanned: i64,
    /// Newest storage modification observed at save time (epoch ms).
    pub storage_modified_at: i64,
    pub count: usize,
    /// Folder path probed for staleness. Absent for playlist-level entries.
    #[serde(default)]
    pub prefix: Option<String>,
}

impl CacheEntry {
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        items: &[MediaItem],
        last_scanned: i64,
        storage_modified_at: i64,
    ) -> Self {
        let items: Vec<String> = items
            .iter()
            .map(|item| item.identifier().to_string())
            .collect();
        Self {
            key: key.into(),
            count: items.len(),
            items,
            last_scanned,
            storage_modified_at,
            prefix: None,
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Stored identifiers as media items.
    #[must_use]
    pub fn media_items(&self) -> Vec<MediaItem> {
        self.items.iter().map(|id| MediaItem::new(id.as_str())).collect()
    }

    /// Age of the entry relative to `now` (epoch ms). Never negative.
    #[must_use]
    pub fn age_millis(&self, now: i64) -> i64 {
        now.saturating_sub(self.last_scanned).max(0)
    }

    /// Returns `true` once the entry is older than `validity_millis`.
    #[must_use]
    pub fn is_expired(&self, now: i64, validity_millis: i64) -> bool {
        self.age_millis(now) > validity_millis
    }

    /// Serializes the record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`](crate::error::Error::Serialization) if
    /// CBOR encoding fails.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        ciborium::into_writer(self, &mut bytes)?;
        Ok(bytes)
    }

    /// Parses a stored record; malformed or inconsistent data yields `None`.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let entry: Self = ciborium::from_reader(bytes).ok()?;
        (entry.count == entry.items.len()).then_some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(names: &[&str]) -> Vec<MediaItem> {
        names.iter().map(|n| MediaItem::new(*n)).collect()
    }

    #[test]
    fn encoded_entry_decodes_identically() {
        let entry = CacheEntry::new("folder_local_ab", &items(&["/a.jpg", "/b.mp4"]), 10, 5)
            .with_prefix("/photos");
        let bytes = entry.encode().expect("encode");
        assert_eq!(CacheEntry::decode(&bytes), Some(entry));
    }

    #[test]
    fn garbage_decodes_to_none() {
        assert_eq!(CacheEntry::decode(b"not cbor at all"), None);
        assert_eq!(CacheEntry::decode(&[]), None);
    }

    #[test]
    fn count_mismatch_is_treated_as_corrupt() {
        let mut entry = CacheEntry::new("k", &items(&["/a.jpg"]), 0, 0);
        entry.count = 7;
        let bytes = entry.encode().expect("encode");
        assert_eq!(CacheEntry::decode(&bytes), None);
    }

    #[test]
    fn expiry_is_strictly_after_the_window() {
        let entry = CacheEntry::new("k", &[], 1_000, 0);
        assert!(!entry.is_expired(1_500, 500));
        assert!(entry.is_expired(1_501, 500));
        // Clock moved backwards: age clamps to zero.
        assert!(!entry.is_expired(0, 500));
    }

    #[test]
    fn media_items_round_trip_identifiers() {
        let original = items(&["/x/1.png", "/x/2.png"]);
        let entry = CacheEntry::new("k", &original, 0, 0);
        assert_eq!(entry.count, 2);
        assert_eq!(entry.media_items(), original);
    }
}
