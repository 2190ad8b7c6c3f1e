//! objstore - persist serializable objects in an embedded key-value engine
//!
//! Callers hand the store any value implementing [`Storable`]; the store
//! assigns its id, encodes it as JSON and writes it to a single `objects`
//! table inside a [redb](https://docs.rs/redb) file, one atomic transaction
//! per call.
//!
//! # Example
//!
//! ```no_run
//! use objstore::{ObjectId, ObjectStore, Storable};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct Note {
//!     id: ObjectId,
//!     text: String,
//! }
//!
//! impl Storable for Note {
//!     fn object_id(&self) -> ObjectId {
//!         self.id
//!     }
//!
//!     fn set_object_id(&mut self, id: ObjectId) {
//!         self.id = id;
//!     }
//! }
//!
//! let store = ObjectStore::open("./notes.redb").unwrap();
//! let mut note = Note { text: "hello".into(), ..Default::default() };
//! let id = store.create(&mut note).unwrap();
//! let loaded: Note = store.read(id).unwrap();
//! store.delete(&loaded).unwrap();
//! store.close();
//! ```

pub mod db;
pub mod storage;
pub mod transaction;

pub use db::{ObjectStore, StoreConfig, StoreStats};
pub use storage::{Namespace, ObjectId, Operation, Storable, StoreError, StoreResult};
pub use transaction::{Batch, TxMode};
