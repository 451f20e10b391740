//! Shared service state handed to every HTTP handler.

use std::path::Path;
use std::sync::Arc;

use sync::{ContentTypeMap, RemoteStore, SyncLedger};

use crate::config::Config;
use crate::watcher::WatcherHandle;

struct Inner {
    config: Config,
    container_name: String,
    content_types: ContentTypeMap,
    store: Arc<dyn RemoteStore>,
    ledger: Arc<dyn SyncLedger>,
    watcher: WatcherHandle,
}

/// Cheap to clone; one [`Inner`] per running service.
#[derive(Clone)]
pub struct ServiceState {
    inner: Arc<Inner>,
}

impl ServiceState {
    pub fn new(
        config: Config,
        store: Arc<dyn RemoteStore>,
        ledger: Arc<dyn SyncLedger>,
        watcher: WatcherHandle,
    ) -> Self {
        let container_name = config.container_name();
        let content_types = config.content_type_map();
        Self {
            inner: Arc::new(Inner {
                config,
                container_name,
                content_types,
                store,
                ledger,
                watcher,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn container_name(&self) -> &str {
        &self.inner.container_name
    }

    pub fn sync_folder(&self) -> &Path {
        &self.inner.config.sync_folder
    }

    pub fn content_types(&self) -> &ContentTypeMap {
        &self.inner.content_types
    }

    pub fn store(&self) -> &dyn RemoteStore {
        &*self.inner.store
    }

    pub fn ledger(&self) -> &dyn SyncLedger {
        &*self.inner.ledger
    }

    pub fn watcher(&self) -> &WatcherHandle {
        &self.inner.watcher
    }
}
