//! Health and build-info probes.

pub mod livez;
pub mod version;
