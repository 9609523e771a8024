//! In-memory [`BucketStore`].
//!
//! Useful for tests and for embedding the operations without a backing file.
//! Every call completes before returning, so each one is trivially atomic.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{PatternError, Result};
use crate::key::encode_hex;
use crate::store::BucketStore;

type Bucket = BTreeMap<Vec<u8>, Vec<u8>>;

/// A [`BucketStore`] held entirely in memory.
///
/// # Examples
///
/// ```
/// use pattern_store_core::{BucketStore, MemoryBucketStore};
///
/// let mut store = MemoryBucketStore::new();
/// store.create_bucket("pattern");
/// store.put("pattern", b"k", b"v").unwrap();
/// assert_eq!(store.get("pattern", b"k").unwrap(), Some(b"v".to_vec()));
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryBucketStore {
    buckets: BTreeMap<String, Bucket>,
}

impl MemoryBucketStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `name` if it does not exist yet.
    pub fn create_bucket(&mut self, name: &str) {
        self.buckets.entry(name.to_string()).or_default();
    }

    fn bucket(&self, name: &str) -> Result<&Bucket> {
        self.buckets
            .get(name)
            .ok_or_else(|| PatternError::NoSuchBucket(name.to_string()))
    }

    fn bucket_mut(&mut self, name: &str) -> Result<&mut Bucket> {
        self.buckets
            .get_mut(name)
            .ok_or_else(|| PatternError::NoSuchBucket(name.to_string()))
    }
}

impl BucketStore for MemoryBucketStore {
    fn bucket_names(&self) -> Result<Vec<String>> {
        Ok(self.buckets.keys().cloned().collect())
    }

    fn for_each_entry(&self, bucket: &str, visit: &mut dyn FnMut(&[u8], &[u8])) -> Result<()> {
        for (key, value) in self.bucket(bucket)? {
            visit(key, value);
        }
        Ok(())
    }

    fn get(&self, bucket: &str, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.bucket(bucket)?.get(key).cloned())
    }

    fn put(&mut self, bucket: &str, key: &[u8], value: &[u8]) -> Result<()> {
        self.bucket_mut(bucket)?.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, bucket: &str, key: &[u8]) -> Result<()> {
        self.bucket_mut(bucket)?.remove(key);
        Ok(())
    }

    fn insert_new(&mut self, bucket: &str, key: &[u8], value: &[u8]) -> Result<()> {
        let entries = self.bucket_mut(bucket)?;
        if entries.contains_key(key) {
            debug!(bucket, key = %encode_hex(key), "refusing to overwrite existing key");
            return Err(PatternError::KeyAlreadyExists(encode_hex(key)));
        }
        entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn replace(
        &mut self,
        bucket: &str,
        old_key: &[u8],
        new_key: &[u8],
        value: &[u8],
    ) -> Result<()> {
        let entries = self.bucket_mut(bucket)?;
        entries.remove(old_key);
        entries.insert(new_key.to_vec(), value.to_vec());
        Ok(())
    }
}
