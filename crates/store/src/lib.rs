//! Remote store backends for blobsync.
//!
//! Implements the engine's [`sync::RemoteStore`] contract on top of the
//! `object_store` crate, so the same daemon talks to S3-compatible
//! services, a local directory, or an in-memory store picked by
//! configuration.

mod config;
mod storage;

pub use config::ObjectStoreConfig;
pub use storage::Storage;
