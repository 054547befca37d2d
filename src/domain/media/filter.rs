// SPDX-License-Identifier: MPL-2.0
//! Media filtering types for the domain layer.
//!
//! Classification is purely extension-based: no file is opened to decide
//! whether it is an image or a video.

use super::MediaType;
use serde::{Deserialize, Serialize};

/// Inclusion policy attached to a playlist and applied to all its folder sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaFilter {
    /// Images only.
    PhotosOnly,
    /// Videos only.
    VideoOnly,
    /// Images and videos.
    #[default]
    Mixed,
}

impl MediaFilter {
    /// Returns `true` if this filter admits the given media type.
    #[must_use]
    pub fn matches_type(&self, media_type: MediaType) -> bool {
        match self {
            Self::Mixed => true,
            Self::PhotosOnly => media_type == MediaType::Image,
            Self::VideoOnly => media_type == MediaType::Video,
        }
    }

    /// Classifies `name` by extension and tests it against this filter.
    ///
    /// Names without a recognised extension never match, even for `Mixed`.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        MediaType::from_name(name).is_some_and(|kind| self.matches_type(kind))
    }

    /// Returns `true` if this filter excludes something (not `Mixed`).
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Mixed)
    }
}

impl std::str::FromStr for MediaFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "photos" | "photos-only" | "images" => Ok(Self::PhotosOnly),
            "videos" | "video-only" | "video" => Ok(Self::VideoOnly),
            "mixed" | "all" => Ok(Self::Mixed),
            other => Err(format!("unknown filter '{other}'")),
        }
    }
}
