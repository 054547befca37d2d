// SPDX-License-Identifier: MPL-2.0
//! Deterministic cache key derivation.
//!
//! Folder keys combine a volume token with a hash of the volume-relative path
//! so that identical relative paths on different volumes never collide.
//! Keys are stable across process restarts.

/// Namespace of flat (non-recursive) folder entries.
pub const FOLDER_NAMESPACE: &str = "folder";

/// Namespace of recursive folder entries.
pub const FOLDER_TREE_NAMESPACE: &str = "foldertree";

/// Namespace of playlist-result entries.
pub const PLAYLIST_NAMESPACE: &str = "playlist";

/// Volume token used for plain paths without a drive or volume prefix.
pub const LOCAL_VOLUME: &str = "local";

const HASH_HEX_LEN: usize = 16;

/// Splits a source identifier into `(volume token, path token)`.
///
/// Understood forms:
/// - document trees: `content://<authority>/tree/<volume>:<path>[/document/...]`
/// - `file://` URIs and plain paths, with an optional `X:` drive prefix
#[must_use]
pub fn split_identifier(identifier: &str) -> (String, String) {
    let decoded = urlencoding::decode(identifier)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_else(|_| identifier.to_string());

    if let Some((_, tree)) = decoded.split_once("/tree/") {
        let tree = tree.split("/document/").next().unwrap_or(tree);
        return match tree.split_once(':') {
            Some((volume, path)) => (sanitize_token(volume), normalize_path(path)),
            None => (sanitize_token(tree), String::new()),
        };
    }

    let path = decoded.strip_prefix("file://").unwrap_or(&decoded);
    let mut chars = path.chars();
    match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) if drive.is_ascii_alphabetic() => {
            (drive.to_ascii_lowercase().to_string(), normalize_path(&path[2..]))
        }
        _ => (LOCAL_VOLUME.to_string(), normalize_path(path)),
    }
}

/// Cache key for a folder source in `namespace`.
#[must_use]
pub fn folder_key(namespace: &str, identifier: &str) -> String {
    let (volume, path) = split_identifier(identifier);
    format!("{namespace}_{volume}_{}", hash_token(&path))
}

/// Cache key for a whole playlist's result set.
#[must_use]
pub fn playlist_key(playlist_id: &str) -> String {
    format!("{PLAYLIST_NAMESPACE}_{}", hash_token(playlist_id))
}

/// Short deterministic hex digest of `token`.
#[must_use]
pub fn hash_token(token: &str) -> String {
    let digest = blake3::hash(token.as_bytes()).to_hex();
    digest.as_str()[..HASH_HEX_LEN].to_string()
}

fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let trimmed = unified.trim_end_matches('/');
    if trimmed.is_empty() && unified.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn sanitize_token(token: &str) -> String {
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if cleaned.is_empty() {
        LOCAL_VOLUME.to_string()
    } else {
        cleaned
    }
}
