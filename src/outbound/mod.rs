//! Outbound adapters implementing the domain ports.

pub mod identity;
pub mod persistence;
pub mod storage;
