//! Translation between absolute local paths and remote object keys.
//!
//! An object key is the path below the synchronization root, with OS
//! separators normalized to `/`. The root is found by name: the innermost
//! ancestor directory whose file name equals the container name.

use std::path::{Component, Path, PathBuf};

use crate::error::{Result, SyncError};

/// Canonical delimiter used in object keys.
pub const KEY_DELIMITER: char = '/';

/// Derive the remote object key for an absolute local path.
///
/// Walks upward from the file until an ancestor directory named
/// `container_name` is found; the key is everything below it. When the
/// container name appears more than once in the path the innermost
/// (closest-to-file) occurrence wins. If no ancestor matches, the
/// filesystem root prefix is stripped instead.
pub fn object_key(container_name: &str, path: &Path) -> Result<String> {
    if !path.is_absolute() {
        return Err(SyncError::InvalidPath(path.to_path_buf()));
    }

    // ancestors() yields deepest-first, so the first hit is the innermost.
    let anchor = path
        .ancestors()
        .skip(1)
        .find(|a| a.file_name().is_some_and(|n| n == container_name));

    let relative = match anchor {
        Some(root) => path
            .strip_prefix(root)
            .map_err(|_| SyncError::InvalidPath(path.to_path_buf()))?
            .to_path_buf(),
        None => strip_root(path),
    };

    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    Ok(segments.join(&KEY_DELIMITER.to_string()))
}

/// Inverse of [`object_key`]: the local path a key maps to below the
/// synchronization root.
pub fn local_path(sync_root: &Path, key: &str) -> PathBuf {
    let mut path = sync_root.to_path_buf();
    for segment in key.split(KEY_DELIMITER).filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path
}

fn strip_root(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}
