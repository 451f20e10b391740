//! Endpoints over the remote container.

pub mod download;
pub mod files;
