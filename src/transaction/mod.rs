//! Transaction handling for the object store.
//!
//! Every store call runs as exactly one engine transaction. Nothing here
//! adds locking on top of the engine: the engine allows one write
//! transaction at a time and any number of snapshot readers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ObjectStore                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!        ┌─────────────────────┼─────────────────────┐
//!        │                     │                     │
//!        ▼                     ▼                     ▼
//!  ┌─────────────┐       ┌─────────────┐       ┌─────────────┐
//!  │   runner    │       │   context   │       │    mode     │
//!  │ (begin/end) │       │ (records,   │       │ (read txn   │
//!  │             │       │  Batch)     │       │  kind)      │
//!  └─────────────┘       └─────────────┘       └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use objstore::ObjectStore;
//!
//! let store = ObjectStore::open("./objects.redb")?;
//!
//! // Several operations, one commit
//! store.batch(|batch| {
//!     batch.create(&mut order)?;
//!     batch.update(&customer)?;
//!     Ok(())
//! })?;
//! ```

pub(crate) mod context;
mod mode;
pub(crate) mod runner;

pub use context::Batch;
pub use mode::TxMode;
