// SPDX-License-Identifier: MPL-2.0
//! Local filesystem adapters for identifier resolution and modification probing.

use super::clock::system_time_millis;
use crate::application::cache::key::split_identifier;
use crate::application::port::{ModificationProbe, PathResolver};
use crate::domain::media::MediaType;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resolves plain paths, `file://` URIs and document-tree identifiers.
///
/// Document-tree identifiers (`content://…/tree/<volume>:<path>`) resolve
/// against the mount root configured for `<volume>`; unknown volumes fail.
#[derive(Debug, Clone, Default)]
pub struct FsPathResolver {
    volumes: BTreeMap<String, PathBuf>,
}

impl FsPathResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `volumes` (lowercase volume token to mount root).
    #[must_use]
    pub fn with_volumes(volumes: BTreeMap<String, PathBuf>) -> Self {
        let volumes = volumes
            .into_iter()
            .map(|(token, root)| (token.to_ascii_lowercase(), root))
            .collect();
        Self { volumes }
    }

    fn candidate(&self, identifier: &str) -> Option<PathBuf> {
        if identifier.contains("/tree/") {
            let (volume, relative) = split_identifier(identifier);
            let root = self.volumes.get(&volume)?;
            return Some(root.join(relative.trim_start_matches('/')));
        }

        let path = match identifier.strip_prefix("file://") {
            Some(uri_path) => urlencoding::decode(uri_path).ok()?.into_owned(),
            None => identifier.to_string(),
        };
        Some(PathBuf::from(path))
    }
}

impl PathResolver for FsPathResolver {
    fn resolve(&self, identifier: &str) -> Option<PathBuf> {
        self.candidate(identifier).filter(|path| path.exists())
    }
}

/// Walks a folder and reports the newest modification time of matching files.
///
/// Directory modification times count for both kinds: adding, renaming or
/// removing an entry bumps its parent directory even when the files
/// themselves keep old timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsModificationProbe;

impl ModificationProbe for FsModificationProbe {
    fn latest_modified(&self, path_prefix: &Path, kind: MediaType) -> io::Result<Option<i64>> {
        // Surface a missing or unreadable root as a probe failure.
        std::fs::metadata(path_prefix)?;

        let mut latest: Option<i64> = None;
        for entry in WalkDir::new(path_prefix).into_iter().filter_map(Result::ok) {
            let file_type = entry.file_type();
            let relevant = file_type.is_dir()
                || (file_type.is_file()
                    && entry
                        .file_name()
                        .to_str()
                        .and_then(MediaType::from_name)
                        == Some(kind));
            if !relevant {
                continue;
            }
            let Some(modified) = entry.metadata().ok().and_then(|m| m.modified().ok()) else {
                continue;
            };
            let millis = system_time_millis(modified);
            latest = Some(latest.map_or(millis, |current| current.max(millis)));
        }
        Ok(latest)
    }
}
