//! Narrow contract for the remote object store, plus an in-memory
//! implementation used by tests and ephemeral deployments.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::content_type::{TransferMode, DEFAULT_CONTENT_TYPE};
use crate::error::{Result, SyncError};

/// One entry in a remote container listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteObject {
    pub key: String,
    pub content_type: String,
    pub modified_utc: Option<DateTime<Utc>>,
}

/// Metadata for a single remote object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub content_type: String,
    pub modified_utc: Option<DateTime<Utc>>,
}

/// The remote blob container, as seen by the sync engine.
///
/// All failures surface as [`SyncError::RemoteUnavailable`]; the engine
/// treats them as pass-level errors and does not retry.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Every object currently in the container.
    async fn list(&self) -> Result<Vec<RemoteObject>>;

    async fn exists(&self, key: &str) -> Result<bool>;

    async fn upload(&self, key: &str, bytes: Bytes, mode: TransferMode) -> Result<()>;

    async fn download(&self, key: &str) -> Result<Bytes>;

    /// Metadata for one object, or `None` if it does not exist.
    async fn metadata(&self, key: &str) -> Result<Option<ObjectMeta>>;

    /// Patch the content-type tag without touching the object's bytes.
    async fn set_content_type(&self, key: &str, content_type: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Bytes,
    content_type: String,
    modified_utc: Option<DateTime<Utc>>,
}

/// In-memory [`RemoteStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object directly, bypassing the upload path. Test helper.
    pub fn put_object(&self, key: &str, bytes: impl Into<Bytes>, modified_utc: DateTime<Utc>) {
        self.objects.lock().insert(
            key.to_string(),
            StoredObject {
                bytes: bytes.into(),
                content_type: DEFAULT_CONTENT_TYPE.to_string(),
                modified_utc: Some(modified_utc),
            },
        );
    }

    /// Overwrite the recorded modification time of an object.
    pub fn set_modified(&self, key: &str, modified_utc: Option<DateTime<Utc>>) {
        if let Some(object) = self.objects.lock().get_mut(key) {
            object.modified_utc = modified_utc;
        }
    }

    pub fn content_type_of(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .get(key)
            .map(|o| o.content_type.clone())
    }

    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list(&self) -> Result<Vec<RemoteObject>> {
        let objects = self.objects.lock();
        Ok(objects
            .iter()
            .map(|(key, object)| RemoteObject {
                key: key.clone(),
                content_type: object.content_type.clone(),
                modified_utc: object.modified_utc,
            })
            .collect())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.objects.lock().contains_key(key))
    }

    async fn upload(&self, key: &str, bytes: Bytes, _mode: TransferMode) -> Result<()> {
        let mut objects = self.objects.lock();
        let content_type = objects
            .get(key)
            .map(|o| o.content_type.clone())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        objects.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type,
                modified_utc: Some(Utc::now()),
            },
        );
        Ok(())
    }

    async fn download(&self, key: &str) -> Result<Bytes> {
        self.objects
            .lock()
            .get(key)
            .map(|o| o.bytes.clone())
            .ok_or_else(|| SyncError::RemoteUnavailable(format!("no such object: {key}")))
    }

    async fn metadata(&self, key: &str) -> Result<Option<ObjectMeta>> {
        Ok(self.objects.lock().get(key).map(|o| ObjectMeta {
            content_type: o.content_type.clone(),
            modified_utc: o.modified_utc,
        }))
    }

    async fn set_content_type(&self, key: &str, content_type: &str) -> Result<()> {
        let mut objects = self.objects.lock();
        let object = objects
            .get_mut(key)
            .ok_or_else(|| SyncError::RemoteUnavailable(format!("no such object: {key}")))?;
        object.content_type = content_type.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_then_download_round_trip() {
        let store = MemoryStore::new();
        store
            .upload("a/b.txt", Bytes::from_static(b"hello"), TransferMode::Whole)
            .await
            .unwrap();

        assert!(store.exists("a/b.txt").await.unwrap());
        assert_eq!(store.download("a/b.txt").await.unwrap().as_ref(), b"hello");

        let meta = store.metadata("a/b.txt").await.unwrap().unwrap();
        assert!(meta.modified_utc.is_some());
    }

    #[tokio::test]
    async fn metadata_of_missing_object_is_none() {
        let store = MemoryStore::new();
        assert!(store.metadata("nope").await.unwrap().is_none());
        assert!(!store.exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn set_content_type_patches_tag_only() {
        let store = MemoryStore::new();
        store.put_object("a.txt", &b"x"[..], Utc::now());

        store.set_content_type("a.txt", "text/plain").await.unwrap();
        assert_eq!(store.content_type_of("a.txt").unwrap(), "text/plain");
        assert_eq!(store.download("a.txt").await.unwrap().as_ref(), b"x");
    }
}
