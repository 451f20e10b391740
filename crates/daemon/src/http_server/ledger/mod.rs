//! Endpoints over the persisted sync ledger.

pub mod clear;
pub mod dump;
