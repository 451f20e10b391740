//! Reconciliation passes wired to the running service.
//!
//! The download pass mutates the sync folder, so the watcher is paused
//! for its whole duration, ledger persistence included, and resumed
//! afterwards whether the pass succeeded or not.

use tracing::info;

use crate::state::ServiceState;

/// Pull remote objects the ledger says are stale. Returns the number
/// of objects fetched.
pub async fn run_download_pass(state: &ServiceState) -> sync::Result<usize> {
    state.watcher().pause().await;
    let result = sync::download_pass(
        state.store(),
        state.ledger(),
        state.container_name(),
        state.sync_folder(),
    )
    .await;
    state.watcher().resume().await;

    if let Ok(count) = &result {
        info!(downloaded = count, "download pass complete");
    }
    result
}

/// Push local files newer than their remote counterparts. The pass
/// only reads the sync folder, so the watcher keeps running.
pub async fn run_upload_pass(state: &ServiceState) -> sync::Result<usize> {
    let result = sync::upload_pass(
        state.store(),
        state.container_name(),
        state.sync_folder(),
        state.content_types(),
    )
    .await;

    if let Ok(count) = &result {
        info!(uploaded = count, "upload pass complete");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use async_trait::async_trait;
    use bytes::Bytes;
    use parking_lot::Mutex;
    use tokio::sync::mpsc;

    use store::ObjectStoreConfig;
    use sync::{
        MemoryLedger, MemoryStore, ObjectMeta, RemoteObject, RemoteStore, SyncError,
        SyncLedger, SyncRecord, TransferMode,
    };

    use crate::config::Config;
    use crate::state::test_support;
    use crate::watcher::{WatcherControl, WatcherHandle};

    /// Interleaves watcher control signals with engine calls. Control
    /// sends complete synchronously on a buffered channel, so draining
    /// the receiver at each mark keeps queued signals in send order.
    struct Timeline {
        control: Mutex<mpsc::Receiver<WatcherControl>>,
        events: Mutex<Vec<&'static str>>,
    }

    impl Timeline {
        fn new(control: mpsc::Receiver<WatcherControl>) -> Arc<Self> {
            Arc::new(Self {
                control: Mutex::new(control),
                events: Mutex::new(Vec::new()),
            })
        }

        fn mark(&self, event: &'static str) {
            self.drain_control();
            self.events.lock().push(event);
        }

        fn drain_control(&self) {
            let mut control = self.control.lock();
            while let Ok(signal) = control.try_recv() {
                self.events.lock().push(match signal {
                    WatcherControl::Pause => "pause",
                    WatcherControl::Resume => "resume",
                });
            }
        }

        fn finish(&self) -> Vec<&'static str> {
            self.drain_control();
            self.events.lock().clone()
        }
    }

    struct RecordingStore {
        inner: MemoryStore,
        timeline: Arc<Timeline>,
    }

    #[async_trait]
    impl RemoteStore for RecordingStore {
        async fn list(&self) -> sync::Result<Vec<RemoteObject>> {
            self.inner.list().await
        }

        async fn exists(&self, key: &str) -> sync::Result<bool> {
            self.inner.exists(key).await
        }

        async fn upload(&self, key: &str, bytes: Bytes, mode: TransferMode) -> sync::Result<()> {
            self.inner.upload(key, bytes, mode).await
        }

        async fn download(&self, key: &str) -> sync::Result<Bytes> {
            self.timeline.mark("transfer");
            self.inner.download(key).await
        }

        async fn metadata(&self, key: &str) -> sync::Result<Option<ObjectMeta>> {
            self.inner.metadata(key).await
        }

        async fn set_content_type(&self, key: &str, content_type: &str) -> sync::Result<()> {
            self.inner.set_content_type(key, content_type).await
        }
    }

    struct RecordingLedger {
        inner: MemoryLedger,
        timeline: Arc<Timeline>,
        fail_persist: bool,
    }

    #[async_trait]
    impl SyncLedger for RecordingLedger {
        async fn query(&self, container_name: &str) -> sync::Result<Vec<SyncRecord>> {
            self.inner.query(container_name).await
        }

        async fn upsert_batch(&self, records: &[SyncRecord]) -> sync::Result<()> {
            self.timeline.mark("persist");
            if self.fail_persist {
                return Err(SyncError::Ledger("ledger offline".to_string()));
            }
            self.inner.upsert_batch(records).await
        }

        async fn clear(&self, container_name: &str) -> sync::Result<usize> {
            self.inner.clear(container_name).await
        }
    }

    fn watched_state(
        root: PathBuf,
        store: Arc<RecordingStore>,
        ledger: Arc<RecordingLedger>,
        watcher: WatcherHandle,
    ) -> ServiceState {
        let config = Config {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            sync_folder: root,
            ledger_db: None,
            store: ObjectStoreConfig::Memory,
            content_types: Vec::new(),
        };
        ServiceState::new(config, store, ledger, watcher)
    }

    fn recording_setup(
        fail_persist: bool,
    ) -> (tempfile::TempDir, ServiceState, Arc<Timeline>) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("box");
        std::fs::create_dir_all(&root).unwrap();

        let (watcher, control) = WatcherHandle::connected(8);
        let timeline = Timeline::new(control);

        let store = MemoryStore::new();
        store.put_object("a.txt", &b"alpha"[..], chrono::Utc::now());
        let store = Arc::new(RecordingStore {
            inner: store,
            timeline: Arc::clone(&timeline),
        });
        let ledger = Arc::new(RecordingLedger {
            inner: MemoryLedger::new(),
            timeline: Arc::clone(&timeline),
            fail_persist,
        });

        let state = watched_state(root, store, ledger, watcher);
        (dir, state, timeline)
    }

    #[tokio::test]
    async fn download_pass_pauses_before_transfer_and_resumes_after_persist() {
        let (_dir, state, timeline) = recording_setup(false);

        assert_eq!(run_download_pass(&state).await.unwrap(), 1);

        assert_eq!(
            timeline.finish(),
            vec!["pause", "transfer", "persist", "resume"]
        );
    }

    #[tokio::test]
    async fn watcher_resumes_when_the_pass_fails() {
        let (_dir, state, timeline) = recording_setup(true);

        assert!(run_download_pass(&state).await.is_err());

        // resume still follows the failed persistence attempt
        assert_eq!(
            timeline.finish(),
            vec!["pause", "transfer", "persist", "resume"]
        );
    }

    #[tokio::test]
    async fn download_pass_materializes_remote_objects() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("box");
        std::fs::create_dir_all(&root).unwrap();

        let store = Arc::new(MemoryStore::new());
        store
            .upload("hello.txt", "hi".into(), TransferMode::Whole)
            .await
            .unwrap();

        let state = test_support::memory_state_with_store(root.clone(), store);
        let fetched = run_download_pass(&state).await.unwrap();

        assert_eq!(fetched, 1);
        assert_eq!(std::fs::read_to_string(root.join("hello.txt")).unwrap(), "hi");
        assert_eq!(state.ledger().query("box").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upload_pass_pushes_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("box");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("note.md"), "# hello").unwrap();

        let state = test_support::memory_state(root);
        let pushed = run_upload_pass(&state).await.unwrap();

        assert_eq!(pushed, 1);
        assert!(state.store().exists("note.md").await.unwrap());
    }
}
