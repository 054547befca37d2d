// SPDX-License-Identifier: MPL-2.0
//! Core media types for the domain layer.

use std::fmt;
use std::sync::Arc;

/// Image file extensions (lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif", "heic"];

/// Video file extensions (lowercase).
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "flv", "wmv", "3gp", "webm", "ts", "m4v",
];

/// Represents different types of media formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// Still image (JPEG, PNG, HEIC, ...).
    Image,
    /// Video container (MP4, MKV, ...).
    Video,
}

impl MediaType {
    /// Classifies a file name by its extension, case-insensitively.
    ///
    /// Returns `None` for names without an extension or with an unknown one.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, extension) = name.rsplit_once('.')?;
        Self::from_extension(extension)
    }

    /// Classifies a bare extension (without the dot).
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::Image)
        } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::Video)
        } else {
            None
        }
    }

    /// Extensions belonging to this kind.
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Image => IMAGE_EXTENSIONS,
            Self::Video => VIDEO_EXTENSIONS,
        }
    }
}

/// A discovered media file, identified by an opaque identifier string.
///
/// Equality and hashing are by identifier only. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaItem(Arc<str>);

impl MediaItem {
    #[must_use]
    pub fn new(identifier: impl Into<Arc<str>>) -> Self {
        Self(identifier.into())
    }

    /// The opaque identifier (a path or URI).
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.0
    }

    /// Last path segment of the identifier, percent-decoded.
    ///
    /// Document-tree identifiers encode their separators (`%2F`, `%3A`), so
    /// decoding happens before the segment is split off.
    #[must_use]
    pub fn display_name(&self) -> String {
        let decoded = urlencoding::decode(&self.0)
            .map(std::borrow::Cow::into_owned)
            .unwrap_or_else(|_| self.0.to_string());
        let trimmed = decoded.trim_end_matches(['/', '\\']);
        trimmed
            .rsplit(['/', '\\', ':'])
            .next()
            .unwrap_or(trimmed)
            .to_string()
    }

    /// Media kind derived from the display name, if recognised.
    #[must_use]
    pub fn media_type(&self) -> Option<MediaType> {
        MediaType::from_name(&self.display_name())
    }
}

impl fmt::Display for MediaItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaItem {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MediaItem {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_extensions_case_insensitively() {
        assert_eq!(MediaType::from_name("a.JPG"), Some(MediaType::Image));
        assert_eq!(MediaType::from_name("b.Heic"), Some(MediaType::Image));
        assert_eq!(MediaType::from_name("c.M4V"), Some(MediaType::Video));
        assert_eq!(MediaType::from_name("archive.tar.gz"), None);
        assert_eq!(MediaType::from_name("README"), None);
    }

    #[test]
    fn formats_outside_the_tables_are_not_media() {
        assert_eq!(MediaType::from_name("scan.tiff"), None);
        assert_eq!(MediaType::from_name("icon.svg"), None);
    }

    #[test]
    fn media_item_equality_is_by_identifier() {
        let a = MediaItem::new("/photos/a.jpg");
        let b = MediaItem::from("/photos/a.jpg".to_string());
        assert_eq!(a, b);
        assert_ne!(a, MediaItem::new("/photos/b.jpg"));
    }

    #[test]
    fn display_name_uses_last_segment() {
        assert_eq!(MediaItem::new("/photos/2024/a.jpg").display_name(), "a.jpg");
        assert_eq!(
            MediaItem::new("content://docs/tree/primary%3ADCIM%2Fb.png").display_name(),
            "b.png"
        );
    }

    #[test]
    fn media_type_comes_from_display_name() {
        assert_eq!(
            MediaItem::new("file:///x/clip.MOV").media_type(),
            Some(MediaType::Video)
        );
        assert_eq!(MediaItem::new("/x/notes.txt").media_type(), None);
    }
}
