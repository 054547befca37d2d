// SPDX-License-Identifier: MPL-2.0
//! Domain layer - pure value types.
//!
//! # Modules
//!
//! - [`media`]: Media types ([`MediaType`](media::MediaType), [`MediaItem`](media::MediaItem),
//!   [`MediaFilter`](media::MediaFilter))
//! - [`playlist`]: Playlist definitions ([`Playlist`](playlist::Playlist),
//!   [`Source`](playlist::Source))

pub mod media;
pub mod playlist;
