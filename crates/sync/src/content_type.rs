//! Extension to content-type / transfer-mode mapping.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Fallback content type for unmapped extensions.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Upload strategy tag for an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// Single-request upload.
    #[default]
    Whole,
    /// Multipart upload for objects written in chunks.
    Chunked,
}

/// Configured mapping from file extension to content type and transfer
/// mode, with a mime-guess fallback for extensions that are not listed.
#[derive(Debug, Clone, Default)]
pub struct ContentTypeMap {
    entries: HashMap<String, (String, TransferMode)>,
}

impl ContentTypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mapping. `ext` is matched case-insensitively, with or
    /// without a leading dot.
    pub fn insert(&mut self, ext: &str, content_type: &str, mode: TransferMode) {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        self.entries.insert(ext, (content_type.to_string(), mode));
    }

    /// The content type to tag `path` with.
    pub fn content_type(&self, path: &Path) -> String {
        if let Some((content_type, _)) = self.lookup(path) {
            return content_type.clone();
        }
        mime_guess::from_path(path)
            .first_raw()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string()
    }

    /// The transfer mode to use when uploading `path`.
    pub fn mode(&self, path: &Path) -> TransferMode {
        self.lookup(path)
            .map(|(_, mode)| *mode)
            .unwrap_or_default()
    }

    fn lookup(&self, path: &Path) -> Option<&(String, TransferMode)> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.entries.get(&ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_extension_wins_over_guess() {
        let mut map = ContentTypeMap::new();
        map.insert(".txt", "text/x-custom", TransferMode::Chunked);
        assert_eq!(map.content_type(Path::new("/a/b.txt")), "text/x-custom");
        assert_eq!(map.mode(Path::new("/a/b.txt")), TransferMode::Chunked);
    }

    #[test]
    fn unmapped_extension_falls_back_to_mime_guess() {
        let map = ContentTypeMap::new();
        assert_eq!(map.content_type(Path::new("/a/b.json")), "application/json");
        assert_eq!(map.mode(Path::new("/a/b.json")), TransferMode::Whole);
    }

    #[test]
    fn unknown_extension_defaults_to_octet_stream() {
        let map = ContentTypeMap::new();
        assert_eq!(
            map.content_type(Path::new("/a/b.zzqq")),
            DEFAULT_CONTENT_TYPE
        );
        assert_eq!(map.content_type(Path::new("/a/noext")), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let mut map = ContentTypeMap::new();
        map.insert("TXT", "text/plain", TransferMode::Whole);
        assert_eq!(map.content_type(Path::new("/a/B.TXT")), "text/plain");
    }
}
