//! Core synchronization engine for blobsync.
//!
//! This crate holds everything that is not wiring: the path translator that
//! maps local files onto object keys, the persisted sync-record model, the
//! download/upload reconciliation decisions, the filesystem-change
//! debouncer, and the transfer orchestrator that executes a pass against
//! the narrow [`RemoteStore`] and [`SyncLedger`] collaborator traits.

pub mod content_type;
pub mod debounce;
pub mod error;
pub mod ledger;
pub mod path;
pub mod reconcile;
pub mod record;
pub mod store;
pub mod transfer;

pub use content_type::{ContentTypeMap, TransferMode, DEFAULT_CONTENT_TYPE};
pub use debounce::{ChangeDebouncer, ChangeEvent, ChangeKind};
pub use error::{Result, SyncError};
pub use ledger::{MemoryLedger, SyncLedger};
pub use path::{local_path, object_key};
pub use reconcile::{download_required, upload_required};
pub use record::{decode_row_key, encode_row_key, SyncRecord};
pub use store::{MemoryStore, ObjectMeta, RemoteObject, RemoteStore};
pub use transfer::{download_pass, upload_pass, walk_folder, FolderEntry};
