//! Endpoints over the local synchronization folder.

pub mod create;
pub mod exists;
pub mod files;
pub mod info;
pub mod upload;
