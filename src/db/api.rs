//! Object store API - the handle callers open, use and close.

use std::path::{Path, PathBuf};

use redb::backends::InMemoryBackend;
use redb::{Builder, Database};
use tracing::debug;

use crate::storage::codec;
use crate::storage::{EngineResultExt, Namespace, ObjectId, Operation, Storable, StoreError, StoreResult};
use crate::transaction::context::{self, Batch};
use crate::transaction::runner;
use crate::transaction::TxMode;

/// Store configuration options.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the backing file.
    pub path: PathBuf,
    /// Create the file if it doesn't exist.
    pub create_if_missing: bool,
    /// Engine page cache size in bytes (engine default when unset).
    pub cache_size: Option<usize>,
    /// Transaction kind used by reads.
    pub read_mode: TxMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("objects.redb"),
            create_if_missing: true,
            cache_size: None,
            read_mode: TxMode::default(),
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set create_if_missing flag.
    pub fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Set the engine cache size in bytes.
    pub fn cache_size(mut self, bytes: usize) -> Self {
        self.cache_size = Some(bytes);
        self
    }

    /// Set the transaction kind used by reads.
    pub fn read_mode(mut self, mode: TxMode) -> Self {
        self.read_mode = mode;
        self
    }

    fn builder(&self) -> Builder {
        let mut builder = Builder::new();
        if let Some(bytes) = self.cache_size {
            builder.set_cache_size(bytes);
        }
        builder
    }
}

/// Handle to an open object store.
///
/// Every object lives in the single [`Namespace::OBJECTS`] table, keyed by
/// its id. Each call runs as exactly one engine transaction; the store adds
/// no locking or caching of its own, so concurrent callers on one handle
/// are ordered by the engine. The handle is `Send + Sync` and can be shared
/// by reference across threads.
///
/// `create` does not check whether the object already carries an id or
/// whether a record exists: calling it twice on the same object stores two
/// records under two different ids.
pub struct ObjectStore {
    config: StoreConfig,
    db: Database,
    namespace: Namespace,
}

impl ObjectStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_config(StoreConfig::new(path.as_ref()))
    }

    /// Open a store with custom configuration.
    pub fn open_with_config(config: StoreConfig) -> StoreResult<Self> {
        if !config.create_if_missing && !config.path.try_exists()? {
            return Err(StoreError::NotFound(config.path.clone()));
        }

        let db = config
            .builder()
            .create(&config.path)
            .map_err(|source| StoreError::Open {
                path: config.path.clone(),
                source,
            })?;

        Self::from_database(config, db)
    }

    /// Create a store backed by memory only (for tests and embedding).
    pub fn in_memory() -> StoreResult<Self> {
        let config = StoreConfig::new(":memory:");
        let db = config
            .builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(|source| StoreError::Open {
                path: config.path.clone(),
                source,
            })?;

        Self::from_database(config, db)
    }

    fn from_database(config: StoreConfig, db: Database) -> StoreResult<Self> {
        let namespace = Namespace::OBJECTS;
        runner::ensure_namespace(&db, namespace)?;
        debug!(path = %config.path.display(), read_mode = %config.read_mode, "store opened");

        Ok(Self {
            config,
            db,
            namespace,
        })
    }

    /// Release the engine handle.
    ///
    /// Consumes the store, so it cannot be closed twice or used afterwards.
    /// Every committed transaction is already durable; the engine reports
    /// nothing on close.
    pub fn close(self) {
        debug!(path = %self.config.path.display(), "store closed");
        drop(self.db);
    }

    /// Assign a fresh id to `obj` and store it.
    ///
    /// Any id already on `obj` is overwritten. Returns the new id.
    pub fn create<T: Storable>(&self, obj: &mut T) -> StoreResult<ObjectId> {
        let id = ObjectId::generate();
        obj.set_object_id(id);
        self.write(obj, Operation::Create)?;
        Ok(id)
    }

    /// Store `obj` under its current id.
    ///
    /// The write is unconditional: a missing record is inserted, an existing
    /// one is overwritten.
    pub fn update<T: Storable>(&self, obj: &T) -> StoreResult<()> {
        self.write(obj, Operation::Update)
    }

    fn write<T: Storable>(&self, obj: &T, op: Operation) -> StoreResult<()> {
        let id = obj.object_id();
        let key = context::key_for(id, op)?;
        let record = codec::encode(obj)?;

        runner::run_write(&self.db, self.namespace, op, |table| {
            context::put_record(table, &key, &record, op)
        })?;

        debug!(%id, %op, bytes = record.len(), "object written");
        Ok(())
    }

    /// Load the object stored under `id`.
    pub fn read<T: Storable>(&self, id: ObjectId) -> StoreResult<T> {
        let op = Operation::Read;
        let key = context::key_for(id, op)?;

        let obj = runner::run_read(&self.db, self.namespace, self.config.read_mode, op, |source| {
            context::load_object(source, id, &key, op)
        })?;

        debug!(%id, "object read");
        Ok(obj)
    }

    /// Load the object stored under `id` into `out`.
    ///
    /// `out` is left untouched when the read fails.
    pub fn read_into<T: Storable>(&self, id: ObjectId, out: &mut T) -> StoreResult<()> {
        *out = self.read(id)?;
        Ok(())
    }

    /// Remove `obj` from the store.
    ///
    /// Deleting an object that has no record is not an error.
    pub fn delete<T: Storable>(&self, obj: &T) -> StoreResult<()> {
        self.delete_id(obj.object_id())
    }

    /// Remove the record under `id`, if any.
    pub fn delete_id(&self, id: ObjectId) -> StoreResult<()> {
        let op = Operation::Delete;
        let key = context::key_for(id, op)?;

        let existed = runner::run_write(&self.db, self.namespace, op, |table| {
            context::remove_record(table, &key, op)
        })?;

        debug!(%id, existed, "object deleted");
        Ok(())
    }

    /// Check whether a record exists under `id`.
    pub fn exists(&self, id: ObjectId) -> StoreResult<bool> {
        let op = Operation::Exists;
        let key = context::key_for(id, op)?;

        runner::run_read(&self.db, self.namespace, self.config.read_mode, op, |source| {
            match source {
                Some(source) => Ok(source.fetch(&key).during(op)?.is_some()),
                None => Ok(false),
            }
        })
    }

    /// Number of stored objects.
    pub fn count(&self) -> StoreResult<u64> {
        let op = Operation::Count;
        runner::run_read(&self.db, self.namespace, self.config.read_mode, op, |source| {
            match source {
                Some(source) => source.size().during(op),
                None => Ok(0),
            }
        })
    }

    /// Ids of all stored objects, in key order.
    pub fn ids(&self) -> StoreResult<Vec<ObjectId>> {
        let op = Operation::List;
        runner::run_read(&self.db, self.namespace, self.config.read_mode, op, |source| {
            let keys = match source {
                Some(source) => source.keys().during(op)?,
                None => Vec::new(),
            };
            keys.iter().map(|key| ObjectId::from_key(key)).collect()
        })
    }

    /// Run several object operations in one atomic transaction.
    ///
    /// Commits when `f` returns `Ok`; on `Err` nothing `f` did is kept.
    pub fn batch<F, R>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut Batch<'_, '_>) -> StoreResult<R>,
    {
        runner::run_write(&self.db, self.namespace, Operation::Batch, |table| {
            let mut batch = Batch::new(table);
            let result = f(&mut batch)?;
            debug!(writes = batch.writes(), "batch committing");
            Ok(result)
        })
    }

    /// Get store statistics.
    pub fn stats(&self) -> StoreResult<StoreStats> {
        Ok(StoreStats {
            objects: self.count()?,
            namespace: self.namespace,
            read_mode: self.config.read_mode,
        })
    }

    /// Get the backing file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("path", &self.config.path)
            .field("namespace", &self.namespace)
            .field("read_mode", &self.config.read_mode)
            .finish()
    }
}

/// Store statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of stored objects.
    pub objects: u64,
    /// Namespace holding the records.
    pub namespace: Namespace,
    /// Transaction kind used by reads.
    pub read_mode: TxMode,
}
