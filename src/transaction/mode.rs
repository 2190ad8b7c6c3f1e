//! Engine transaction modes.
//!
//! Writes always run in a read-write transaction. Reads can use either:
//! - ReadOnly: a snapshot transaction that runs alongside other readers
//!   and the single active writer
//! - ReadWrite: a full write transaction, serialized with every other writer

use std::fmt;

/// Which kind of engine transaction a read runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxMode {
    /// Snapshot read.
    ///
    /// Sees the state as of the last commit before the read began and never
    /// waits on writers. The namespace is not created by the read; the store
    /// creates it once when it is opened.
    #[default]
    ReadOnly,

    /// Read inside a write transaction.
    ///
    /// Creates the namespace if it is missing and holds the engine's writer
    /// slot for the duration of the lookup. Observable results are the same
    /// as `ReadOnly`; only concurrency differs.
    ReadWrite,
}

impl TxMode {
    /// Check if this mode takes the engine's writer slot.
    pub fn is_write(&self) -> bool {
        matches!(self, TxMode::ReadWrite)
    }

    /// Get a human-readable description of this mode.
    pub fn description(&self) -> &'static str {
        match self {
            TxMode::ReadOnly => "reads see a committed snapshot and run concurrently",
            TxMode::ReadWrite => "reads run inside a serialized write transaction",
        }
    }
}

impl fmt::Display for TxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxMode::ReadOnly => write!(f, "READ ONLY"),
            TxMode::ReadWrite => write!(f, "READ WRITE"),
        }
    }
}

impl std::str::FromStr for TxMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "READ ONLY" | "READ_ONLY" | "READONLY" | "RO" | "SNAPSHOT" => Ok(TxMode::ReadOnly),
            "READ WRITE" | "READ_WRITE" | "READWRITE" | "RW" => Ok(TxMode::ReadWrite),
            _ => Err(format!("unknown transaction mode: {}", s)),
        }
    }
}
