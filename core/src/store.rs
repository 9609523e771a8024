//! Store gateway contract.
//!
//! [`BucketStore`] is the ordered key-value collection the high-level
//! operations run against. Implementations keep entries of each bucket in
//! byte-wise key order and scope every call to a single transaction, so no
//! call leaves a transaction open behind it.

use crate::error::Result;

/// A single key/value pair read from a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl Entry {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered, bucketed key-value storage.
///
/// Lookups and mutations on a missing bucket fail with
/// [`PatternError::NoSuchBucket`](crate::PatternError::NoSuchBucket). Buckets
/// are created by the implementation, never through this trait.
pub trait BucketStore {
    /// Names of all buckets, sorted.
    fn bucket_names(&self) -> Result<Vec<String>>;

    /// Visits every entry of `bucket` in key order.
    ///
    /// Each call starts a fresh iteration.
    fn for_each_entry(&self, bucket: &str, visit: &mut dyn FnMut(&[u8], &[u8])) -> Result<()>;

    /// Looks up a single value.
    fn get(&self, bucket: &str, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Inserts or overwrites a value.
    fn put(&mut self, bucket: &str, key: &[u8], value: &[u8]) -> Result<()>;

    /// Removes a key. Removing an absent key succeeds.
    fn delete(&mut self, bucket: &str, key: &[u8]) -> Result<()>;

    /// Inserts a value only if `key` is absent, as one atomic step.
    ///
    /// Fails with
    /// [`PatternError::KeyAlreadyExists`](crate::PatternError::KeyAlreadyExists)
    /// when the key is taken.
    fn insert_new(&mut self, bucket: &str, key: &[u8], value: &[u8]) -> Result<()>;

    /// Removes `old_key` and stores `value` under `new_key`, as one atomic step.
    fn replace(
        &mut self,
        bucket: &str,
        old_key: &[u8],
        new_key: &[u8],
        value: &[u8],
    ) -> Result<()>;

    /// Collects every entry of `bucket` in key order.
    fn entries(&self, bucket: &str) -> Result<Vec<Entry>> {
        let mut out = Vec::new();
        self.for_each_entry(bucket, &mut |key, value| out.push(Entry::new(key, value)))?;
        Ok(out)
    }
}
