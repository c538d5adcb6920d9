//! Local key-value persistence, scoped by partition.
//!
//! No transactions: each call is atomic on its own, read-modify-write
//! sequences across calls are not.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    /// Credentials. Cleared on logout.
    Auth,
    /// App-level flags and cached payloads.
    App,
}

impl Partition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Auth => "auth",
            Partition::App => "app",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Partition '{partition}' is corrupt: {source}")]
    Corrupt {
        partition: Partition,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, partition: Partition, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, partition: Partition, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deleting a missing key is not an error.
    fn delete(&self, partition: Partition, key: &str) -> Result<(), StoreError>;

    fn clear(&self, partition: Partition) -> Result<(), StoreError>;
}
