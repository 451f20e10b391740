use std::path::PathBuf;

pub type Result<T, E = SyncError> = std::result::Result<T, E>;

/// Error taxonomy for the sync engine.
///
/// `InvalidPath` is fatal to a single operation, `RemoteUnavailable` aborts
/// the whole pass before any ledger mutation, and `LocalIo` is isolated to
/// the file it occurred on.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("path is not absolute: {0}")]
    InvalidPath(PathBuf),
    #[error("remote store unavailable: {0}")]
    RemoteUnavailable(String),
    #[error("local io on {path}: {source}")]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("ledger backend: {0}")]
    Ledger(String),
}

impl SyncError {
    pub fn local_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LocalIo {
            path: path.into(),
            source,
        }
    }

    pub fn remote(err: impl std::fmt::Display) -> Self {
        Self::RemoteUnavailable(err.to_string())
    }
}
