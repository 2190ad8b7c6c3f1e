//! storage primitives for the object store
//!
//! This module owns everything that sits between a domain object and the
//! engine's raw bytes: identifiers, key encoding, the record codec and the
//! error type. The upper layers (transactions, the store handle) use this
//! API and never encode keys or records themselves.
//!
//! # Layout
//!
//! ```text
//!   Storable object ──► codec::encode ──► record bytes ─┐
//!        │                                              ├──► "objects" namespace
//!        └──► ObjectId ──► to_key ──► 16-byte key ──────┘
//! ```

pub mod codec;
mod error;
mod types;

// Re-export public API
pub use error::{Operation, StoreError, StoreResult};
pub use types::{Namespace, ObjectId, Storable, KEY_LEN};

pub(crate) use error::EngineResultExt;
