//! Inspection and editing operations over a [`BucketStore`].
//!
//! Each function takes the store handle explicitly and performs exactly one
//! logical operation. Keys cross this boundary in their `0x` hex form; the
//! read paths never return session-scoped entries (see
//! [`is_visible`](crate::is_visible)).

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PatternError, Result};
use crate::fingerprint::fingerprint;
use crate::key::{decode_hex, encode_hex};
use crate::store::BucketStore;
use crate::visibility::is_visible;

/// A slice `[start, start + length)` of a bucket's visible entries.
///
/// Out-of-range values are clamped rather than rejected; a `length` of
/// [`Page::ALL`] selects everything from `start` to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub start: i64,
    pub length: i64,
}

impl Page {
    /// Length that selects every remaining entry.
    pub const ALL: i64 = -1;
    /// Length used when the caller does not choose one.
    pub const DEFAULT_LENGTH: i64 = 10;

    pub fn new(start: i64, length: i64) -> Self {
        Self { start, length }
    }

    /// Every entry.
    pub fn all() -> Self {
        Self::new(0, Self::ALL)
    }

    /// Resolves this page against `total` entries.
    ///
    /// ```
    /// use pattern_store_core::Page;
    ///
    /// assert_eq!(Page::new(2, 10).bounds(5), 2..5);
    /// assert_eq!(Page::new(-3, 2).bounds(5), 0..2);
    /// assert_eq!(Page::new(9, 1).bounds(5), 5..5);
    /// assert_eq!(Page::new(1, Page::ALL).bounds(5), 1..5);
    /// ```
    pub fn bounds(&self, total: usize) -> Range<usize> {
        let total = i64::try_from(total).unwrap_or(i64::MAX);
        let start = self.start.clamp(0, total);
        let remaining = total - start;
        let length = if self.length == Self::ALL {
            remaining
        } else {
            self.length.clamp(0, remaining)
        };
        // Both values are within [0, total], which came from a usize.
        start as usize..(start + length) as usize
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LENGTH)
    }
}

/// An entry as shown to an operator: hex key and textual value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexEntry {
    pub key: String,
    pub value: String,
}

/// Payload returned by [`add_value`] once serialized into an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedKey {
    pub key: String,
}

/// Where [`set_value`] stores the new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetMode {
    /// Re-key the entry under the fingerprint of the new value.
    #[default]
    Fingerprint,
    /// Keep the key supplied by the caller.
    KeepKey,
}

/// Lists every bucket in the store.
pub fn list_buckets<S: BucketStore + ?Sized>(store: &S) -> Result<Vec<String>> {
    store.bucket_names()
}

/// Lists one page of the visible entries of `bucket`.
///
/// # Errors
///
/// Returns [`PatternError::NoSuchBucket`] if the bucket is missing. An
/// existing bucket without visible entries yields an empty list.
pub fn list_keys<S: BucketStore + ?Sized>(
    store: &S,
    bucket: &str,
    page: Page,
) -> Result<Vec<HexEntry>> {
    let mut visible = Vec::new();
    let mut hidden = 0usize;
    store.for_each_entry(bucket, &mut |key, value| {
        if is_visible(key) {
            visible.push((key.to_vec(), value.to_vec()));
        } else {
            hidden += 1;
        }
    })?;
    debug!(bucket, visible = visible.len(), hidden, "listed bucket entries");

    let range = page.bounds(visible.len());
    Ok(visible[range]
        .iter()
        .map(|(key, value)| HexEntry {
            key: encode_hex(key),
            value: render_value(value),
        })
        .collect())
}

/// Fetches the value stored under a hex key.
///
/// # Errors
///
/// Returns key codec errors, [`PatternError::NoSuchBucket`], or
/// [`PatternError::KeyNotFound`] when the key is absent or session-scoped.
pub fn get_value<S: BucketStore + ?Sized>(
    store: &S,
    bucket: &str,
    hex_key: &str,
) -> Result<String> {
    let key = decode_hex(hex_key)?;
    if !is_visible(&key) {
        debug!(bucket, key = hex_key, "hiding session-scoped key");
        return Err(PatternError::KeyNotFound(hex_key.to_string()));
    }
    store
        .get(bucket, &key)?
        .map(|value| render_value(&value))
        .ok_or_else(|| PatternError::KeyNotFound(hex_key.to_string()))
}

/// Stores a SQL statement under its own fingerprint.
///
/// The existence check and the insert happen in one store transaction.
/// Returns the hex form of the new key.
///
/// # Errors
///
/// Returns [`PatternError::WrongArguments`] if `value` has no tokens,
/// [`PatternError::KeyAlreadyExists`] if the fingerprint is already stored,
/// and [`PatternError::NoSuchBucket`] if the bucket is missing.
pub fn add_value<S: BucketStore + ?Sized>(
    store: &mut S,
    bucket: &str,
    value: &str,
) -> Result<String> {
    let key = fingerprint(value);
    ensure_key(&key)?;
    store.insert_new(bucket, &key, value.as_bytes())?;
    let hex_key = encode_hex(&key);
    info!(bucket, key = %hex_key, "added pattern");
    Ok(hex_key)
}

/// Replaces the entry at `hex_key` with `value`.
///
/// The old entry is removed and the new one written in one store
/// transaction. With [`SetMode::Fingerprint`] the value moves to its
/// fingerprint, so editing the SQL text of a pattern re-keys it. Returns the
/// hex form of the key the value now lives under.
///
/// # Errors
///
/// Returns key codec errors, [`PatternError::WrongArguments`] when the
/// target key would be empty, or [`PatternError::NoSuchBucket`].
pub fn set_value<S: BucketStore + ?Sized>(
    store: &mut S,
    bucket: &str,
    hex_key: &str,
    value: &str,
    mode: SetMode,
) -> Result<String> {
    let old_key = decode_hex(hex_key)?;
    let new_key = match mode {
        SetMode::Fingerprint => fingerprint(value),
        SetMode::KeepKey => old_key.clone(),
    };
    ensure_key(&new_key)?;
    store.replace(bucket, &old_key, &new_key, value.as_bytes())?;
    let new_hex = encode_hex(&new_key);
    info!(bucket, old_key = hex_key, new_key = %new_hex, "updated entry");
    Ok(new_hex)
}

/// Deletes the entry at `hex_key`. Deleting an absent key succeeds.
///
/// # Errors
///
/// Returns key codec errors (leaving the store untouched) or
/// [`PatternError::NoSuchBucket`].
pub fn delete_key<S: BucketStore + ?Sized>(
    store: &mut S,
    bucket: &str,
    hex_key: &str,
) -> Result<()> {
    let key = decode_hex(hex_key)?;
    store.delete(bucket, &key)?;
    info!(bucket, key = hex_key, "deleted entry");
    Ok(())
}

// Blank input or a lone `;` fingerprints to nothing.
fn ensure_key(key: &[u8]) -> Result<()> {
    if key.is_empty() {
        return Err(PatternError::WrongArguments("value has no tokens".to_string()));
    }
    Ok(())
}

fn render_value(value: &[u8]) -> String {
    String::from_utf8_lossy(value).into_owned()
}
