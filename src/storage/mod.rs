//! Persistence layer for job records
//!
//! Defines the append-only sink the pipeline persists validated records
//! into, plus the SQLite-backed implementation. Deduplication is enforced
//! upstream by the pipeline; the sink stores whatever it is given.

mod sqlite;

pub use sqlite::SqliteJobStore;

use crate::job::JobRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Append-only sink for validated job records
///
/// Implementations must be safe to call from concurrent pipeline tasks.
pub trait JobSink: Send + Sync {
    /// Appends one validated record
    fn push(&self, record: &JobRecord) -> StorageResult<()>;

    /// Returns all stored records in insertion order
    fn load_all(&self) -> StorageResult<Vec<JobRecord>>;
}
