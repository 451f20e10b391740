//! Daemon configuration, loaded once at startup from a TOML file and
//! passed by reference from there on. No global lazy state.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use store::ObjectStoreConfig;
use sync::{ContentTypeMap, TransferMode};

/// One extension mapping entry in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentTypeEntry {
    pub ext: String,
    pub content_type: String,
    #[serde(default)]
    pub mode: TransferMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP control surface listens on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Local synchronization root. Its file name doubles as the remote
    /// container name.
    pub sync_folder: PathBuf,
    /// SQLite ledger database path; `None` keeps the ledger in memory.
    #[serde(default)]
    pub ledger_db: Option<PathBuf>,
    /// Remote object storage backend.
    pub store: ObjectStoreConfig,
    /// Extension to content-type / transfer-mode mappings.
    #[serde(default)]
    pub content_types: Vec<ContentTypeEntry>,
}

fn default_listen_addr() -> SocketAddr {
    "127.0.0.1:7070".parse().expect("static default address")
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {e}", path.display()))?;
        let config: Config = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Default config file location under the platform config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("blobsync")
            .join("blobsync.toml")
    }

    /// The container name is the sync folder's file name.
    pub fn container_name(&self) -> String {
        self.sync_folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "blobsync".to_string())
    }

    pub fn content_type_map(&self) -> ContentTypeMap {
        let mut map = ContentTypeMap::new();
        for entry in &self.content_types {
            map.insert(&entry.ext, &entry.content_type, entry.mode);
        }
        map
    }
}
