// SPDX-License-Identifier: MPL-2.0
//! Storage-facing port definitions.
//!
//! [`PathResolver`] turns opaque source identifiers into scannable paths and
//! [`ModificationProbe`] answers the cheap "newest file under this prefix"
//! question the folder cache uses for staleness detection.

use crate::domain::media::MediaType;
use std::io;
use std::path::{Path, PathBuf};

/// Port resolving an opaque source identifier to a filesystem path.
///
/// Returning `None` means the source cannot be scanned; the scanner skips it.
pub trait PathResolver: Send + Sync {
    fn resolve(&self, identifier: &str) -> Option<PathBuf>;
}

/// Port for storage metadata queries.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; probes run on blocking worker threads.
pub trait ModificationProbe: Send + Sync {
    /// Returns the most recent modification time (epoch milliseconds) among
    /// files of `kind` whose path lies under `path_prefix`.
    ///
    /// `Ok(None)` means no matching file exists.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the storage metadata cannot be queried. Callers
    /// treat an error as "no information" (time 0).
    fn latest_modified(&self, path_prefix: &Path, kind: MediaType) -> io::Result<Option<i64>>;
}

impl<F> PathResolver for F
where
    F: Fn(&str) -> Option<PathBuf> + Send + Sync,
{
    fn resolve(&self, identifier: &str) -> Option<PathBuf> {
        self(identifier)
    }
}

/// Newest modification time across images and videos under `path_prefix`.
///
/// Issues exactly two point queries. A failing query counts as time 0 and an
/// empty result as 0, so the returned value is never negative.
pub fn probe_latest_media_change(probe: &dyn ModificationProbe, path_prefix: &Path) -> i64 {
    [MediaType::Image, MediaType::Video]
        .into_iter()
        .map(|kind| match probe.latest_modified(path_prefix, kind) {
            Ok(time) => time.unwrap_or(0),
            Err(error) => {
                tracing::warn!(
                    prefix = %path_prefix.display(),
                    ?kind,
                    %error,
                    "modification probe failed, assuming no change"
                );
                0
            }
        })
        .max()
        .unwrap_or(0)
}
