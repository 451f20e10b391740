//! The per-file sync-necessity decisions.

use chrono::{DateTime, Utc};

use crate::record::SyncRecord;
use crate::store::ObjectMeta;

/// Decide whether a remote object must be downloaded.
///
/// `remote_modified` is the live remote modification time, `local_modified`
/// the local file's mtime (`None` when the file does not exist). Clauses
/// are evaluated in a fixed precedence order, first true wins:
///
/// 1. local file missing
/// 2. remote modification time unavailable
/// 3. record has no remote timestamp
/// 4. remote strictly newer than the recorded remote timestamp
/// 5. record has no local timestamp
/// 6. local strictly newer than the recorded local timestamp
/// 7. record has no last-sync time
/// 8. remote strictly newer than the last sync
/// 9. local strictly newer than the last sync
///
/// Any evidence of drift, including missing ledger state, forces a
/// refresh. This biases toward re-downloading over silent staleness and
/// means a locally modified file can be overwritten by a download: a
/// deliberate last-writer-wins trade-off, not conflict detection.
pub fn download_required(
    record: &SyncRecord,
    remote_modified: Option<DateTime<Utc>>,
    local_modified: Option<DateTime<Utc>>,
) -> bool {
    let local = match local_modified {
        None => return true,
        Some(t) => t,
    };
    let remote = match remote_modified {
        None => return true,
        Some(t) => t,
    };

    let recorded_remote = match record.remote_modified_utc {
        None => return true,
        Some(t) => t,
    };
    if remote > recorded_remote {
        return true;
    }

    let recorded_local = match record.local_modified_utc {
        None => return true,
        Some(t) => t,
    };
    if local > recorded_local {
        return true;
    }

    let last_sync = match record.last_sync_utc {
        None => return true,
        Some(t) => t,
    };

    remote > last_sync || local > last_sync
}

/// Decide whether a local file must be uploaded.
///
/// `remote` is the metadata probe result, with `None` meaning the object
/// is absent (a failed probe counts as absent). Upload when the object
/// does not exist or the local file is strictly newer. An existing object
/// with no modification time is never overwritten; the ledger is not
/// consulted in this direction.
pub fn upload_required(local_modified: DateTime<Utc>, remote: Option<&ObjectMeta>) -> bool {
    match remote {
        None => true,
        Some(meta) => match meta.modified_utc {
            Some(remote_modified) => local_modified > remote_modified,
            None => false,
        },
    }
}
