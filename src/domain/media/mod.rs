// SPDX-License-Identifier: MPL-2.0
//! Media domain types.
//!
//! This module contains core media types that are independent of any
//! storage or presentation concerns.

pub mod filter;
pub mod types;

// Re-export commonly used types
pub use filter::MediaFilter;
pub use types::{MediaItem, MediaType, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
