//! Adapters implementing the domain ports.

pub mod fixture;
pub mod in_memory;
pub mod payment_controller;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
