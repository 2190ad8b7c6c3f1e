//! Record operations inside an open write transaction.
//!
//! The free functions here are the single place where keys and records
//! meet the engine table. [`Batch`] exposes them to callers that want
//! several object operations committed atomically.

use tracing::debug;

use crate::storage::codec;
use crate::storage::{EngineResultExt, ObjectId, Operation, Storable, StoreError, StoreResult, KEY_LEN};
use crate::transaction::runner::{RecordSource, RecordTable};

/// Engine key for `id`, rejecting the nil id before any engine access.
pub(crate) fn key_for(id: ObjectId, op: Operation) -> StoreResult<[u8; KEY_LEN]> {
    id.to_key().ok_or(StoreError::InvalidIdentifier { op })
}

/// Unconditionally store `record` under `key`.
pub(crate) fn put_record(
    table: &mut RecordTable<'_>,
    key: &[u8; KEY_LEN],
    record: &[u8],
    op: Operation,
) -> StoreResult<()> {
    table.insert(&key[..], record).during(op)?;
    Ok(())
}

/// Remove the record under `key`. Returns whether one was present.
pub(crate) fn remove_record(
    table: &mut RecordTable<'_>,
    key: &[u8; KEY_LEN],
    op: Operation,
) -> StoreResult<bool> {
    let removed = table.remove(&key[..]).during(op)?;
    Ok(removed.is_some())
}

/// Fetch and decode the object stored under `id`.
pub(crate) fn load_object<T: Storable>(
    source: Option<&dyn RecordSource>,
    id: ObjectId,
    key: &[u8; KEY_LEN],
    op: Operation,
) -> StoreResult<T> {
    let record = match source {
        Some(source) => source.fetch(key).during(op)?,
        None => None,
    };

    match record {
        Some(bytes) => codec::decode(&bytes),
        None => Err(StoreError::ObjectNotFound(id)),
    }
}

/// A group of object operations committed as one engine transaction.
///
/// Handed out by [`ObjectStore::batch`]. Reads see the batch's own
/// uncommitted writes. Nothing is visible to other transactions until the
/// batch closure returns `Ok`.
///
/// [`ObjectStore::batch`]: crate::db::ObjectStore::batch
pub struct Batch<'a, 'txn> {
    table: &'a mut RecordTable<'txn>,
    writes: usize,
}

impl<'a, 'txn> Batch<'a, 'txn> {
    pub(crate) fn new(table: &'a mut RecordTable<'txn>) -> Self {
        Self { table, writes: 0 }
    }

    /// Assign a fresh id to `obj` and store it.
    ///
    /// Any id already on `obj` is replaced.
    pub fn create<T: Storable>(&mut self, obj: &mut T) -> StoreResult<ObjectId> {
        let id = ObjectId::generate();
        obj.set_object_id(id);
        self.update(obj)?;
        Ok(id)
    }

    /// Store `obj` under its id, inserting or overwriting.
    pub fn update<T: Storable>(&mut self, obj: &T) -> StoreResult<()> {
        let key = key_for(obj.object_id(), Operation::Batch)?;
        let record = codec::encode(obj)?;
        put_record(self.table, &key, &record, Operation::Batch)?;
        self.writes += 1;
        debug!(id = %obj.object_id(), bytes = record.len(), "batched update");
        Ok(())
    }

    /// Load the object stored under `id`.
    pub fn read<T: Storable>(&self, id: ObjectId) -> StoreResult<T> {
        let key = key_for(id, Operation::Batch)?;
        let source: &dyn RecordSource = &*self.table;
        load_object(Some(source), id, &key, Operation::Batch)
    }

    /// Load the object stored under `id` into `out`.
    pub fn read_into<T: Storable>(&self, id: ObjectId, out: &mut T) -> StoreResult<()> {
        *out = self.read(id)?;
        Ok(())
    }

    /// Remove `obj`. Missing records are not an error.
    pub fn delete<T: Storable>(&mut self, obj: &T) -> StoreResult<()> {
        self.delete_id(obj.object_id())
    }

    /// Remove the record under `id`. Missing records are not an error.
    pub fn delete_id(&mut self, id: ObjectId) -> StoreResult<()> {
        let key = key_for(id, Operation::Batch)?;
        remove_record(self.table, &key, Operation::Batch)?;
        self.writes += 1;
        debug!(%id, "batched delete");
        Ok(())
    }

    /// Check whether a record exists under `id`.
    pub fn exists(&self, id: ObjectId) -> StoreResult<bool> {
        let key = key_for(id, Operation::Batch)?;
        Ok(self.table.fetch(&key).during(Operation::Batch)?.is_some())
    }

    /// number of writes issued so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl std::fmt::Debug for Batch<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Batch").field("writes", &self.writes).finish()
    }
}

#[cfg(test)]
mod tests {
    use redb::backends::InMemoryBackend;
    use redb::{Builder, Database};
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::storage::Namespace;
    use crate::transaction::runner::run_write;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        id: ObjectId,
        hits: u64,
    }

    impl Storable for Counter {
        fn object_id(&self) -> ObjectId {
            self.id
        }

        fn set_object_id(&mut self, id: ObjectId) {
            self.id = id;
        }
    }

    fn memory_db() -> Database {
        Builder::new()
            .create_with_backend(InMemoryBackend::new())
            .unwrap()
    }

    #[test]
    fn test_key_for_rejects_nil() {
        let err = key_for(ObjectId::nil(), Operation::Delete).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidIdentifier {
                op: Operation::Delete
            }
        ));
    }

    #[test]
    fn test_batch_sees_own_writes() {
        let db = memory_db();
        run_write(&db, Namespace::OBJECTS, Operation::Batch, |table| {
            let mut batch = Batch::new(table);
            let mut counter = Counter { hits: 3, ..Default::default() };
            let id = batch.create(&mut counter)?;

            let loaded: Counter = batch.read(id)?;
            assert_eq!(loaded, counter);
            assert!(batch.exists(id)?);

            batch.delete(&counter)?;
            assert!(!batch.exists(id)?);
            assert_eq!(batch.writes(), 2);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_load_missing_namespace_is_not_found() {
        let id = ObjectId::generate();
        let key = id.to_key().unwrap();
        let result: StoreResult<Counter> = load_object(None, id, &key, Operation::Read);
        assert!(matches!(result, Err(StoreError::ObjectNotFound(missing)) if missing == id));
    }

    #[test]
    fn test_remove_reports_presence() {
        let db = memory_db();
        run_write(&db, Namespace::OBJECTS, Operation::Delete, |table| {
            let key = ObjectId::generate().to_key().unwrap();
            assert!(!remove_record(table, &key, Operation::Delete)?);
            put_record(table, &key, b"{}", Operation::Update)?;
            assert!(remove_record(table, &key, Operation::Delete)?);
            Ok(())
        })
        .unwrap();
    }
}
