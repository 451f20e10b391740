use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which object storage backend to talk to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum ObjectStoreConfig {
    /// S3 or any S3-compatible service (MinIO, R2, ...).
    S3 {
        endpoint: String,
        access_key: String,
        secret_key: String,
        bucket: String,
        region: Option<String>,
    },
    /// A directory on the local filesystem standing in for the container.
    Local { path: PathBuf },
    /// Ephemeral in-memory storage, lost on shutdown. Useful for tests.
    Memory,
}
