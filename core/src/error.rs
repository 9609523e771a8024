//! Error types for pattern store operations.
//!
//! Every failure an operation can report is a variant here; the display text
//! is what ends up in a failure envelope's `message`.

use thiserror::Error;

/// Errors that can occur while decoding keys or operating on a store.
#[derive(Debug, Error)]
pub enum PatternError {
    /// Key text does not start with `0x`.
    #[error("wrong key prefix: '{0}' must start with 0x")]
    BadKeyPrefix(String),

    /// Key digits are not valid hex.
    #[error("malformed hex key '{key}': {reason}")]
    MalformedHex { key: String, reason: String },

    /// Requested bucket does not exist.
    #[error("bucket not exist: {0}")]
    NoSuchBucket(String),

    /// Requested key is absent or hidden.
    #[error("key not exists: {0}")]
    KeyNotFound(String),

    /// A pattern with the same fingerprint is already stored.
    #[error("key already exists: {0}")]
    KeyAlreadyExists(String),

    /// The argument combination does not fit the requested action.
    #[error("wrong arguments: {0}")]
    WrongArguments(String),

    /// Failure reported by the storage backend.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Convenience alias for results with [`PatternError`].
pub type Result<T> = std::result::Result<T, PatternError>;
