//! Persisted per-object sync state.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last-known sync state for one remote object.
///
/// Keyed by `(container_name, object_key)`. A record may exist with no
/// local file present (remote-only object), and a freshly created record
/// carries no timestamps at all. Records are created lazily during
/// reconciliation, mutated only after a successful transfer, and removed
/// only by a ledger clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecord {
    pub container_name: String,
    pub object_key: String,
    pub local_path: String,
    pub last_sync_utc: Option<DateTime<Utc>>,
    pub local_modified_utc: Option<DateTime<Utc>>,
    pub remote_modified_utc: Option<DateTime<Utc>>,
}

impl SyncRecord {
    /// A fresh record for an object that has never been synced.
    pub fn new(container_name: impl Into<String>, object_key: impl Into<String>) -> Self {
        Self {
            container_name: container_name.into(),
            object_key: object_key.into(),
            local_path: String::new(),
            last_sync_utc: None,
            local_modified_utc: None,
            remote_modified_utc: None,
        }
    }

    /// Encoded row key used by ledger backends.
    pub fn row_key(&self) -> String {
        encode_row_key(&self.object_key)
    }
}

/// Encode an object key into a storage-safe row key. Object keys contain
/// `/` and arbitrary file name bytes, which most keyed stores reject.
pub fn encode_row_key(object_key: &str) -> String {
    URL_SAFE_NO_PAD.encode(object_key)
}

/// Decode a row key back into the object key it was derived from.
pub fn decode_row_key(row_key: &str) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(row_key).ok()?;
    String::from_utf8(bytes).ok()
}
