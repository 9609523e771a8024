//! Bucketed key-value storage in a single SQLite file.
//!
//! Provides [`SqliteBucketStore`], the file-backed [`BucketStore`]. Every
//! call runs in its own transaction: reads use a deferred transaction,
//! writes take the write lock up front (`BEGIN IMMEDIATE`) so that
//! check-then-write sequences from concurrent processes serialize. A
//! transaction that is not committed rolls back when it goes out of scope.
//!
//! # Example
//!
//! ```no_run
//! use pattern_store_core::{BucketStore, ops};
//! use pattern_store_sqlite::SqliteBucketStore;
//!
//! let mut store = SqliteBucketStore::create("patterns.db").unwrap();
//! store.create_bucket("pattern").unwrap();
//!
//! let key = ops::add_value(&mut store, "pattern", "select * from users").unwrap();
//! println!("stored under {key}");
//! ```

use std::path::Path;
use std::time::Duration;

use pattern_store_core::{BucketStore, encode_hex};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Transaction, TransactionBehavior, params};
use tracing::{debug, info};

use crate::error::{Result, SqliteError};
use crate::schema::{generate_schema_sql, validate_prefix};

/// Table prefix used when none is given.
pub const DEFAULT_PREFIX: &str = "kv_";

/// How long a call waits for another process's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A [`BucketStore`] backed by a SQLite connection.
///
/// Owns its connection; dropping the store closes the file.
///
/// # Examples
///
/// ```
/// use pattern_store_core::BucketStore;
/// use pattern_store_sqlite::SqliteBucketStore;
///
/// let mut store = SqliteBucketStore::open_in_memory().unwrap();
/// store.create_bucket("pattern").unwrap();
/// store.put("pattern", b"k", b"v").unwrap();
///
/// assert_eq!(store.bucket_names().unwrap(), vec!["pattern"]);
/// assert_eq!(store.get("pattern", b"k").unwrap(), Some(b"v".to_vec()));
/// ```
pub struct SqliteBucketStore {
    conn: Connection,
    prefix: String,
}

impl SqliteBucketStore {
    /// Opens an existing store file with the default table prefix.
    ///
    /// # Errors
    ///
    /// Fails if the file does not exist, cannot be opened for writing, is
    /// not a SQLite database, or holds no store tables.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_prefix(path, DEFAULT_PREFIX)
    }

    /// Opens an existing store file using tables named with `prefix`.
    ///
    /// The file is never modified here; it must already hold the store
    /// tables.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open), plus [`SqliteError::InvalidPrefix`] and
    /// [`SqliteError::NotAStore`] when the store tables are missing.
    pub fn open_with_prefix(path: impl AsRef<Path>, prefix: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        configure(&conn)?;
        if !has_store_tables(&conn, &prefix)? {
            return Err(SqliteError::NotAStore(path.display().to_string()));
        }
        debug!(path = %path.display(), prefix = %prefix, "opened store file");
        Ok(Self { conn, prefix })
    }

    /// Opens a store file, creating it if it does not exist.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened or created store file");
        Self::from_connection(conn, DEFAULT_PREFIX)
    }

    /// Creates a throwaway store in memory.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, DEFAULT_PREFIX)
    }

    /// Wraps an existing connection, creating the store tables if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidPrefix`] if the prefix is invalid, or a
    /// database error if the tables cannot be created.
    pub fn from_connection(mut conn: Connection, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        configure(&conn)?;

        let sql = generate_schema_sql(&prefix)?;
        let tx = conn.transaction()?;
        tx.execute_batch(&sql)?;
        tx.commit()?;

        Ok(Self { conn, prefix })
    }

    /// Returns the table prefix in use.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the store and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Creates `name` if it does not exist yet.
    pub fn create_bucket(&mut self, name: &str) -> Result<()> {
        let tx = write_tx(&mut self.conn)?;
        let created = tx.execute(
            &format!("INSERT OR IGNORE INTO {}buckets (name) VALUES (?1)", self.prefix),
            params![name],
        )?;
        tx.commit()?;
        if created > 0 {
            info!(bucket = name, "created bucket");
        }
        Ok(())
    }

    /// Removes a bucket and every entry in it.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::BucketNotFound`] if the bucket does not exist.
    pub fn drop_bucket(&mut self, name: &str) -> Result<()> {
        let tx = write_tx(&mut self.conn)?;
        let rows = tx.execute(
            &format!("DELETE FROM {}buckets WHERE name = ?1", self.prefix),
            params![name],
        )?;
        if rows == 0 {
            return Err(SqliteError::BucketNotFound(name.to_string()));
        }
        tx.commit()?;
        info!(bucket = name, "dropped bucket");
        Ok(())
    }

    /// Counts all entries in a bucket, session-scoped ones included.
    pub fn entry_count(&self, bucket: &str) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        ensure_bucket(&tx, &self.prefix, bucket)?;
        let count: i64 = tx.query_row(
            &format!("SELECT COUNT(*) FROM {}entries WHERE bucket = ?1", self.prefix),
            params![bucket],
            |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn load_bucket_names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT name FROM {}buckets ORDER BY name", self.prefix))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn visit_entries(&self, bucket: &str, visit: &mut dyn FnMut(&[u8], &[u8])) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        ensure_bucket(&tx, &self.prefix, bucket)?;
        {
            let mut stmt = tx.prepare(&format!(
                "SELECT entry_key, entry_value FROM {}entries WHERE bucket = ?1 ORDER BY entry_key",
                self.prefix
            ))?;
            let mut rows = stmt.query(params![bucket])?;
            while let Some(row) = rows.next()? {
                let key: Vec<u8> = row.get(0)?;
                let value: Vec<u8> = row.get(1)?;
                visit(&key, &value);
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_value(&self, bucket: &str, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let tx = self.conn.unchecked_transaction()?;
        ensure_bucket(&tx, &self.prefix, bucket)?;
        let value = select_value(&tx, &self.prefix, bucket, key)?;
        tx.commit()?;
        Ok(value)
    }

    fn store_value(&mut self, bucket: &str, key: &[u8], value: &[u8]) -> Result<()> {
        let prefix = self.prefix.as_str();
        let tx = write_tx(&mut self.conn)?;
        ensure_bucket(&tx, prefix, bucket)?;
        upsert(&tx, prefix, bucket, key, value)?;
        tx.commit()?;
        Ok(())
    }

    fn remove_key(&mut self, bucket: &str, key: &[u8]) -> Result<()> {
        let prefix = self.prefix.as_str();
        let tx = write_tx(&mut self.conn)?;
        ensure_bucket(&tx, prefix, bucket)?;
        remove(&tx, prefix, bucket, key)?;
        tx.commit()?;
        Ok(())
    }

    fn insert_if_absent(&mut self, bucket: &str, key: &[u8], value: &[u8]) -> Result<()> {
        let prefix = self.prefix.as_str();
        let tx = write_tx(&mut self.conn)?;
        ensure_bucket(&tx, prefix, bucket)?;
        if select_value(&tx, prefix, bucket, key)?.is_some() {
            debug!(bucket, key = %encode_hex(key), "key already present");
            return Err(SqliteError::KeyExists(encode_hex(key)));
        }
        upsert(&tx, prefix, bucket, key, value)?;
        tx.commit()?;
        Ok(())
    }

    fn move_entry(
        &mut self,
        bucket: &str,
        old_key: &[u8],
        new_key: &[u8],
        value: &[u8],
    ) -> Result<()> {
        let prefix = self.prefix.as_str();
        let tx = write_tx(&mut self.conn)?;
        ensure_bucket(&tx, prefix, bucket)?;
        remove(&tx, prefix, bucket, old_key)?;
        upsert(&tx, prefix, bucket, new_key, value)?;
        tx.commit()?;
        Ok(())
    }
}

impl BucketStore for SqliteBucketStore {
    fn bucket_names(&self) -> pattern_store_core::Result<Vec<String>> {
        Ok(self.load_bucket_names()?)
    }

    fn for_each_entry(
        &self,
        bucket: &str,
        visit: &mut dyn FnMut(&[u8], &[u8]),
    ) -> pattern_store_core::Result<()> {
        Ok(self.visit_entries(bucket, visit)?)
    }

    fn get(&self, bucket: &str, key: &[u8]) -> pattern_store_core::Result<Option<Vec<u8>>> {
        Ok(self.load_value(bucket, key)?)
    }

    fn put(&mut self, bucket: &str, key: &[u8], value: &[u8]) -> pattern_store_core::Result<()> {
        Ok(self.store_value(bucket, key, value)?)
    }

    fn delete(&mut self, bucket: &str, key: &[u8]) -> pattern_store_core::Result<()> {
        Ok(self.remove_key(bucket, key)?)
    }

    fn insert_new(
        &mut self,
        bucket: &str,
        key: &[u8],
        value: &[u8],
    ) -> pattern_store_core::Result<()> {
        Ok(self.insert_if_absent(bucket, key, value)?)
    }

    fn replace(
        &mut self,
        bucket: &str,
        old_key: &[u8],
        new_key: &[u8],
        value: &[u8],
    ) -> pattern_store_core::Result<()> {
        Ok(self.move_entry(bucket, old_key, new_key, value)?)
    }
}

fn configure(conn: &Connection) -> Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(())
}

fn has_store_tables(conn: &Connection, prefix: &str) -> Result<bool> {
    let found: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN (?1, ?2)",
        params![format!("{prefix}buckets"), format!("{prefix}entries")],
        |row| row.get(0),
    )?;
    Ok(found == 2)
}

fn write_tx(conn: &mut Connection) -> Result<Transaction<'_>> {
    Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
}

fn ensure_bucket(conn: &Connection, prefix: &str, bucket: &str) -> Result<()> {
    let exists: bool = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {prefix}buckets WHERE name = ?1)"),
        params![bucket],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(SqliteError::BucketNotFound(bucket.to_string()))
    }
}

fn select_value(
    conn: &Connection,
    prefix: &str,
    bucket: &str,
    key: &[u8],
) -> Result<Option<Vec<u8>>> {
    let value = conn
        .query_row(
            &format!(
                "SELECT entry_value FROM {prefix}entries WHERE bucket = ?1 AND entry_key = ?2"
            ),
            params![bucket, key],
            |row| row.get::<_, Vec<u8>>(0),
        )
        .optional()?;
    Ok(value)
}

fn upsert(conn: &Connection, prefix: &str, bucket: &str, key: &[u8], value: &[u8]) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO {prefix}entries (bucket, entry_key, entry_value) VALUES (?1, ?2, ?3)
             ON CONFLICT (bucket, entry_key) DO UPDATE SET entry_value = excluded.entry_value"
        ),
        params![bucket, key, value],
    )?;
    Ok(())
}

fn remove(conn: &Connection, prefix: &str, bucket: &str, key: &[u8]) -> Result<()> {
    conn.execute(
        &format!("DELETE FROM {prefix}entries WHERE bucket = ?1 AND entry_key = ?2"),
        params![bucket, key],
    )?;
    Ok(())
}
