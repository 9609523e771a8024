//! SQLite storage backend for learned pattern stores.
//!
//! This crate provides [`SqliteBucketStore`], a [`BucketStore`] kept in a
//! single SQLite file. Buckets map to rows of a bucket table and their
//! entries to BLOB key/value rows, so iteration comes back in byte-wise key
//! order just like the store operations expect.
//!
//! # Architecture
//!
//! - **`schema`**: SQL generation with customizable table prefixes
//! - **`store`**: the [`BucketStore`] implementation plus bucket management
//!
//! # Quick start
//!
//! ```no_run
//! use pattern_store_core::ops;
//! use pattern_store_core::Page;
//! use pattern_store_sqlite::SqliteBucketStore;
//!
//! let store = SqliteBucketStore::open("/tmp/model/10.0.0.1_mysql.db").unwrap();
//! for entry in ops::list_keys(&store, "pattern", Page::default()).unwrap() {
//!     println!("{} {}", entry.key, entry.value);
//! }
//! ```
//!
//! # Table prefix customization
//!
//! All table names are prefixed with a configurable string (default
//! [`DEFAULT_PREFIX`]), allowing several isolated stores within the same
//! SQLite database. Prefixes must contain only alphanumeric characters and
//! underscores.
//!
//! [`BucketStore`]: pattern_store_core::BucketStore

mod error;
mod schema;
mod store;

pub use error::{Result, SqliteError};
pub use schema::generate_schema_sql;
pub use store::{DEFAULT_PREFIX, SqliteBucketStore};
