//! Error types for the SQLite bucket store.
//!
//! Provides a unified error type covering database access, prefix
//! validation, and bucket/key lookups, plus the mapping into
//! [`PatternError`] used by the store operations.

use pattern_store_core::PatternError;
use thiserror::Error;

/// Errors that can occur during SQLite store operations.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Table prefix contains invalid characters.
    #[error("invalid prefix '{0}': must contain only alphanumeric characters and underscores")]
    InvalidPrefix(String),

    /// The file is a database but holds no store tables for the prefix.
    #[error("not a pattern store: {0}")]
    NotAStore(String),

    /// Requested bucket does not exist.
    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    /// Key is already present in the bucket (hex form).
    #[error("key exists: {0}")]
    KeyExists(String),
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;

impl From<SqliteError> for PatternError {
    fn from(err: SqliteError) -> Self {
        match err {
            SqliteError::BucketNotFound(name) => PatternError::NoSuchBucket(name),
            SqliteError::KeyExists(key) => PatternError::KeyAlreadyExists(key),
            other => PatternError::Storage(Box::new(other)),
        }
    }
}
