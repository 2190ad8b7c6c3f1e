//! High-level object store handle.
//!
//! This module provides the user-facing API: opening a store, the
//! create/read/update/delete operations and batched writes.

mod api;

pub use api::{ObjectStore, StoreConfig, StoreStats};
