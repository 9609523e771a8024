//! SQL schema generation with customizable table prefixes.
//!
//! Buckets and their entries live in two tables:
//!
//! - `{prefix}buckets`: one row per bucket name
//! - `{prefix}entries`: `(bucket, entry_key, entry_value)` rows keyed by
//!   `(bucket, entry_key)`
//!
//! Keys and values are stored as BLOBs. SQLite compares BLOBs with
//! `memcmp`, so the primary key index yields entries in byte-wise key order.
//! Deleting a bucket row cascades to its entries.
//!
//! # Custom prefix
//!
//! Prefixes must contain only alphanumeric characters and underscores. This
//! enables several isolated stores (e.g., `kv_`, `test_`) in one database
//! file.

use crate::error::{Result, SqliteError};

/// Validates that a table prefix contains only alphanumeric characters and underscores.
pub(crate) fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(SqliteError::InvalidPrefix(prefix.to_string()));
    }
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SqliteError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Generates the bucket and entry tables for the given prefix.
///
/// Uses `CREATE TABLE IF NOT EXISTS`, so running it against an initialised
/// file is a no-op.
///
/// # Errors
///
/// Returns [`SqliteError::InvalidPrefix`] if the prefix contains characters
/// other than alphanumerics and underscores, or if it is empty.
pub fn generate_schema_sql(prefix: &str) -> Result<String> {
    validate_prefix(prefix)?;

    let sql = format!(
        r#"
CREATE TABLE IF NOT EXISTS {prefix}buckets (
    name TEXT PRIMARY KEY NOT NULL
);

CREATE TABLE IF NOT EXISTS {prefix}entries (
    bucket TEXT NOT NULL,
    entry_key BLOB NOT NULL,
    entry_value BLOB NOT NULL,
    PRIMARY KEY (bucket, entry_key),
    FOREIGN KEY (bucket) REFERENCES {prefix}buckets(name) ON DELETE CASCADE
);
"#,
        prefix = prefix
    );

    Ok(sql)
}
