//! Object store error types
//!
//! Every failure surfaces as a [`StoreError`]. Engine failures carry the
//! operation that triggered them; nothing is retried or logged-and-dropped.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::storage::types::ObjectId;

/// the store operation an error happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Open,
    Create,
    Read,
    Update,
    Delete,
    Exists,
    Count,
    List,
    Batch,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Open => "open",
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Exists => "exists",
            Operation::Count => "count",
            Operation::List => "list",
            Operation::Batch => "batch",
        };
        f.write_str(name)
    }
}

/// the main error type for store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// the backing file could not be opened, created or locked
    #[error("failed to open store at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: redb::DatabaseError,
    },

    /// the backing file does not exist and creation was disabled
    #[error("store not found: {0}")]
    NotFound(PathBuf),

    /// the operation was given a nil id
    #[error("can't {op} object with nil id")]
    InvalidIdentifier { op: Operation },

    /// raw key bytes that do not decode to an id
    #[error("invalid object key of {len} bytes")]
    InvalidKey { len: usize },

    /// record encoding or decoding failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// no record is stored under the id
    #[error("object does not exist: {0}")]
    ObjectNotFound(ObjectId),

    /// transaction, namespace or commit failure inside the engine
    #[error("engine error during {op}: {source}")]
    Engine {
        op: Operation,
        #[source]
        source: redb::Error,
    },

    /// I/O error (filesystem level)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// wrap an engine error with the operation it belongs to
    pub fn engine(op: Operation, source: impl Into<redb::Error>) -> Self {
        StoreError::Engine {
            op,
            source: source.into(),
        }
    }

    /// check if this error means the object or store doesn't exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::ObjectNotFound(_) | StoreError::NotFound(_)
        )
    }

    /// check if the caller passed an unusable id or key
    pub fn is_invalid_identifier(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidIdentifier { .. } | StoreError::InvalidKey { .. }
        )
    }

    /// check if this error came from the engine itself
    pub fn is_engine(&self) -> bool {
        matches!(self, StoreError::Open { .. } | StoreError::Engine { .. })
    }

    /// the operation tag, when the error carries one
    pub fn operation(&self) -> Option<Operation> {
        match self {
            StoreError::InvalidIdentifier { op } | StoreError::Engine { op, .. } => Some(*op),
            StoreError::Open { .. } | StoreError::NotFound(_) => Some(Operation::Open),
            _ => None,
        }
    }
}

/// result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Attach an [`Operation`] to engine results.
pub(crate) trait EngineResultExt<T> {
    fn during(self, op: Operation) -> StoreResult<T>;
}

impl<T, E> EngineResultExt<T> for Result<T, E>
where
    E: Into<redb::Error>,
{
    fn during(self, op: Operation) -> StoreResult<T> {
        self.map_err(|e| StoreError::engine(op, e))
    }
}
