//! Transaction runners - one engine transaction per call.
//!
//! A runner opens the engine transaction, opens the namespace table, hands
//! it to a closure and then:
//! - commits if the closure returns Ok
//! - aborts if the closure returns Err
//!
//! Engine failures are tagged with the calling [`Operation`].

use redb::{
    Database, ReadableTable, ReadableTableMetadata, StorageError as EngineStorageError, Table,
    TableError,
};
use tracing::trace;

use crate::storage::{EngineResultExt, Namespace, Operation, StoreResult};
use crate::transaction::mode::TxMode;

/// The namespace table as seen from inside a write transaction.
pub(crate) type RecordTable<'txn> = Table<'txn, &'static [u8], &'static [u8]>;

/// Read access to stored records, independent of transaction kind.
pub(crate) trait RecordSource {
    /// fetch the record stored under `key`
    fn fetch(&self, key: &[u8]) -> Result<Option<Vec<u8>>, EngineStorageError>;

    /// number of records in the namespace
    fn size(&self) -> Result<u64, EngineStorageError>;

    /// all keys in key order
    fn keys(&self) -> Result<Vec<Vec<u8>>, EngineStorageError>;
}

impl<T> RecordSource for T
where
    T: ReadableTable<&'static [u8], &'static [u8]> + ReadableTableMetadata,
{
    fn fetch(&self, key: &[u8]) -> Result<Option<Vec<u8>>, EngineStorageError> {
        Ok(self.get(key)?.map(|guard| guard.value().to_vec()))
    }

    fn size(&self) -> Result<u64, EngineStorageError> {
        self.len()
    }

    fn keys(&self) -> Result<Vec<Vec<u8>>, EngineStorageError> {
        let mut keys = Vec::new();
        for entry in self.iter()? {
            let (key, _) = entry?;
            keys.push(key.value().to_vec());
        }
        Ok(keys)
    }
}

/// Run `f` inside a read-write transaction on `namespace`.
///
/// The namespace is created if it does not exist yet.
pub(crate) fn run_write<F, T>(
    db: &Database,
    namespace: Namespace,
    op: Operation,
    f: F,
) -> StoreResult<T>
where
    F: FnOnce(&mut RecordTable<'_>) -> StoreResult<T>,
{
    let txn = db.begin_write().during(op)?;
    trace!(%op, %namespace, "write transaction started");

    let result = {
        let mut table = txn.open_table(namespace.table()).during(op)?;
        f(&mut table)
    };

    match result {
        Ok(value) => {
            txn.commit().during(op)?;
            trace!(%op, "write transaction committed");
            Ok(value)
        }
        Err(e) => {
            // the closure's error wins; a failed abort still discards the txn
            if let Err(abort_err) = txn.abort() {
                trace!(%op, error = %abort_err, "write transaction abort failed");
            }
            trace!(%op, error = %e, "write transaction aborted");
            Err(e)
        }
    }
}

/// Run `f` against `namespace` in a transaction of the given mode.
///
/// `f` receives `None` when a read-only transaction finds no namespace.
pub(crate) fn run_read<F, T>(
    db: &Database,
    namespace: Namespace,
    mode: TxMode,
    op: Operation,
    f: F,
) -> StoreResult<T>
where
    F: FnOnce(Option<&dyn RecordSource>) -> StoreResult<T>,
{
    match mode {
        TxMode::ReadWrite => run_write(db, namespace, op, |table| {
            let source: &dyn RecordSource = &*table;
            f(Some(source))
        }),
        TxMode::ReadOnly => {
            let txn = db.begin_read().during(op)?;
            trace!(%op, %namespace, "read transaction started");

            match txn.open_table(namespace.table()) {
                Ok(table) => {
                    let source: &dyn RecordSource = &table;
                    f(Some(source))
                }
                Err(TableError::TableDoesNotExist(_)) => f(None),
                Err(e) => Err(e).during(op),
            }
        }
    }
}

/// Create `namespace` if it is missing.
pub(crate) fn ensure_namespace(db: &Database, namespace: Namespace) -> StoreResult<()> {
    run_write(db, namespace, Operation::Open, |_| Ok(()))
}
