//! Core identity types for the object store.

use std::fmt;
use std::str::FromStr;

use redb::TableDefinition;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::storage::error::{StoreError, StoreResult};

/// Width of an encoded object key.
pub const KEY_LEN: usize = 16;

/// Unique identifier of a persisted object.
///
/// 128 bits wide. The nil value (all zeros) means "not assigned yet" and is
/// never written to the engine. `Default` yields nil so domain types can
/// derive `Default` and receive a real id from [`ObjectStore::create`].
///
/// [`ObjectStore::create`]: crate::db::ObjectStore::create
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(Ulid);

impl ObjectId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    /// The unset identifier.
    pub const fn nil() -> Self {
        Self(Ulid::nil())
    }

    /// check if the id has not been assigned
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }

    /// Millisecond timestamp embedded in the id at generation time.
    pub fn timestamp_ms(&self) -> u64 {
        self.0.timestamp_ms()
    }

    /// Encode as the fixed-width engine key.
    ///
    /// Returns `None` for the nil id; callers turn that into
    /// [`StoreError::InvalidIdentifier`] before touching the engine.
    pub fn to_key(&self) -> Option<[u8; KEY_LEN]> {
        if self.is_nil() {
            return None;
        }
        Some(self.0.to_bytes())
    }

    /// Decode an engine key. Exact inverse of [`ObjectId::to_key`].
    pub fn from_key(key: &[u8]) -> StoreResult<Self> {
        let bytes: [u8; KEY_LEN] = key
            .try_into()
            .map_err(|_| StoreError::InvalidKey { len: key.len() })?;

        let id = Self(Ulid::from_bytes(bytes));
        if id.is_nil() {
            return Err(StoreError::InvalidKey { len: key.len() });
        }
        Ok(id)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::nil()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s).map(Self)
    }
}

impl From<Ulid> for ObjectId {
    fn from(ulid: Ulid) -> Self {
        Self(ulid)
    }
}

/// A value the store can persist.
///
/// The store never looks at any field other than the id; everything else
/// travels through the record codec untouched.
pub trait Storable: Serialize + DeserializeOwned {
    /// current id of the object (nil when never stored)
    fn object_id(&self) -> ObjectId;

    /// replace the id of the object
    fn set_object_id(&mut self, id: ObjectId);
}

/// Name of an engine table holding records.
///
/// Every object kind shares [`Namespace::OBJECTS`]; ids must therefore be
/// unique across kinds stored in the same file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Namespace(&'static str);

impl Namespace {
    /// the single namespace used by the store
    pub const OBJECTS: Namespace = Namespace("objects");

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub(crate) const fn table(&self) -> TableDefinition<'static, &'static [u8], &'static [u8]> {
        TableDefinition::new(self.0)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
