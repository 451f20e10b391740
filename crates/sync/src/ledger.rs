//! Narrow contract for the persisted sync-state ledger, plus an in-memory
//! implementation used by tests and ephemeral deployments.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::Result;
use crate::record::SyncRecord;

/// The persisted mapping from object key to last-known sync metadata.
///
/// Backends keep no cache across calls; a record is only as fresh as the
/// last `upsert_batch` that wrote it.
#[async_trait]
pub trait SyncLedger: Send + Sync {
    /// All records for a container. No ordering guarantee beyond
    /// stability within one call.
    async fn query(&self, container_name: &str) -> Result<Vec<SyncRecord>>;

    /// Insert-or-replace each record, keyed by `(container_name,
    /// object_key)`. Idempotent; a no-op for an empty batch. Backends
    /// apply the batch atomically where the store supports it.
    async fn upsert_batch(&self, records: &[SyncRecord]) -> Result<()>;

    /// Delete every record for the container; returns the number removed.
    async fn clear(&self, container_name: &str) -> Result<usize>;
}

/// In-memory [`SyncLedger`].
#[derive(Debug, Default)]
pub struct MemoryLedger {
    records: Mutex<BTreeMap<(String, String), SyncRecord>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl SyncLedger for MemoryLedger {
    async fn query(&self, container_name: &str) -> Result<Vec<SyncRecord>> {
        let records = self.records.lock();
        Ok(records
            .values()
            .filter(|r| r.container_name == container_name)
            .cloned()
            .collect())
    }

    async fn upsert_batch(&self, records: &[SyncRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let mut map = self.records.lock();
        for record in records {
            map.insert(
                (record.container_name.clone(), record.row_key()),
                record.clone(),
            );
        }
        Ok(())
    }

    async fn clear(&self, container_name: &str) -> Result<usize> {
        let mut map = self.records.lock();
        let before = map.len();
        map.retain(|(container, _), _| container != container_name);
        Ok(before - map.len())
    }
}
