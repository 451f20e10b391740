//! Transfer orchestration: executes the reconciliation decisions for one
//! pass and persists the resulting ledger updates in a single batch.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::content_type::ContentTypeMap;
use crate::error::{Result, SyncError};
use crate::ledger::SyncLedger;
use crate::path::{local_path, object_key};
use crate::reconcile::{download_required, upload_required};
use crate::record::SyncRecord;
use crate::store::RemoteStore;

/// A local file discovered by the recursive walk. Recomputed every pass,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub path: PathBuf,
    pub relative: PathBuf,
}

/// Recursively list the files under `root`.
pub fn walk_folder(root: &Path) -> Result<Vec<FolderEntry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root) {
        let entry =
            entry.map_err(|e| SyncError::local_io(root, std::io::Error::from(e)))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();
        entries.push(FolderEntry {
            path: entry.path().to_path_buf(),
            relative,
        });
    }
    Ok(entries)
}

/// The local file's modification time, or `None` if it does not exist.
pub fn local_modified_utc(path: &Path) -> Option<DateTime<Utc>> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

/// Run one download pass: list the container, reconcile every object
/// against the ledger, transfer what drifted, and persist all record
/// updates in one batch. Returns the number of transfers performed.
///
/// Listing or ledger failures abort the pass before any ledger mutation.
/// A local IO failure skips that file only.
pub async fn download_pass(
    store: &dyn RemoteStore,
    ledger: &dyn SyncLedger,
    container_name: &str,
    sync_root: &Path,
) -> Result<usize> {
    let objects = store.list().await?;
    let known = ledger.query(container_name).await?;

    let mut updates: Vec<SyncRecord> = Vec::new();

    for object in &objects {
        let path = local_path(sync_root, &object.key);
        let mut record = known
            .iter()
            .find(|r| r.object_key == object.key)
            .cloned()
            .unwrap_or_else(|| SyncRecord::new(container_name, &object.key));

        if !download_required(&record, object.modified_utc, local_modified_utc(&path)) {
            debug!(key = %object.key, "object up to date");
            continue;
        }

        match fetch_object(store, &object.key, &path).await {
            Ok(()) => {
                record.local_path = path.display().to_string();
                record.last_sync_utc = Some(Utc::now());
                record.local_modified_utc = local_modified_utc(&path);
                record.remote_modified_utc = object.modified_utc;
                info!(key = %object.key, path = %path.display(), "downloaded object");
                updates.push(record);
            }
            Err(err @ SyncError::LocalIo { .. }) => {
                warn!(key = %object.key, error = %err, "skipping object after local io failure");
            }
            Err(err) => return Err(err),
        }
    }

    let transferred = updates.len();
    ledger.upsert_batch(&updates).await?;
    info!(container = container_name, transferred, "download pass complete");
    Ok(transferred)
}

/// Run one upload pass: walk the local tree, upload every file that is
/// missing remotely or newer locally, and reconcile each object's
/// content-type tag against the configured map. Returns the upload count.
///
/// The ledger is not consulted in this direction; a failed metadata probe
/// is treated as an absent object.
pub async fn upload_pass(
    store: &dyn RemoteStore,
    container_name: &str,
    sync_root: &Path,
    content_types: &ContentTypeMap,
) -> Result<usize> {
    let files = walk_folder(sync_root)?;
    let mut uploaded = 0usize;

    for entry in &files {
        let key = object_key(container_name, &entry.path)?;
        let meta = store.metadata(&key).await.ok().flatten();

        // the file can vanish between the walk and the read
        let Some(local_modified) = local_modified_utc(&entry.path) else {
            continue;
        };

        let mut transferred = false;
        if upload_required(local_modified, meta.as_ref()) {
            let bytes = match std::fs::read(&entry.path) {
                Ok(bytes) => Bytes::from(bytes),
                Err(err) => {
                    warn!(path = %entry.path.display(), error = %err, "skipping unreadable file");
                    continue;
                }
            };
            store
                .upload(&key, bytes, content_types.mode(&entry.path))
                .await?;
            info!(key = %key, "uploaded object");
            uploaded += 1;
            transferred = true;
        }

        // the content-type tag is reconciled for every file, uploaded or not
        let desired = content_types.content_type(&entry.path);
        let current = if transferred || meta.is_none() {
            store.metadata(&key).await?.map(|m| m.content_type)
        } else {
            meta.map(|m| m.content_type)
        };
        if current.as_deref() != Some(desired.as_str()) {
            store.set_content_type(&key, &desired).await?;
            debug!(key = %key, content_type = %desired, "patched content type");
        }
    }

    info!(container = container_name, uploaded, "upload pass complete");
    Ok(uploaded)
}

/// Download one object through a temp-file-then-rename write so a crash
/// never leaves a partial file at the destination.
async fn fetch_object(store: &dyn RemoteStore, key: &str, path: &Path) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| SyncError::InvalidPath(path.to_path_buf()))?;
    std::fs::create_dir_all(parent).map_err(|e| SyncError::local_io(parent, e))?;

    let bytes = store.download(key).await?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| SyncError::local_io(parent, e))?;
    std::io::Write::write_all(&mut tmp, &bytes).map_err(|e| SyncError::local_io(path, e))?;
    tmp.persist(path)
        .map_err(|e| SyncError::local_io(path, e.error))?;
    Ok(())
}
