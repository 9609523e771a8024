//! Fingerprinting and inspection primitives for learned SQL pattern stores.
//!
//! A database firewall learns which statement shapes are normal by storing
//! one example statement per structural fingerprint. This crate provides the
//! pieces needed to read and edit such a store:
//!
//! - [`Lexer`]: classifies SQL text into [`Token`]s from a frozen
//!   token-kind table ([`token`]).
//! - [`fingerprint`]: turns a statement into its binary pattern key.
//! - [`encode_hex`] / [`decode_hex`]: the `0x…` text form of keys.
//! - [`is_visible`]: hides session-scoped entries from inspection.
//! - [`BucketStore`]: the ordered key-value storage contract, with an
//!   in-memory implementation in [`MemoryBucketStore`].
//! - [`ops`]: list/get/add/set/delete over any [`BucketStore`].
//! - [`Envelope`]: the JSON result reported for every operation.
//!
//! # Example
//!
//! ```
//! use pattern_store_core::*;
//!
//! let mut store = MemoryBucketStore::new();
//! store.create_bucket("pattern");
//!
//! let key = ops::add_value(&mut store, "pattern", "select * from first").unwrap();
//! assert_eq!(key, "0x0000e0030000002a0000e0076669727374");
//!
//! let value = ops::get_value(&store, "pattern", &key).unwrap();
//! assert_eq!(value, "select * from first");
//!
//! let listed = ops::list_keys(&store, "pattern", Page::default()).unwrap();
//! assert_eq!(listed.len(), 1);
//! ```

mod envelope;
mod error;
mod fingerprint;
mod key;
mod lexer;
mod memory;
pub mod ops;
mod store;
pub mod token;
mod visibility;

pub use envelope::{Envelope, FAILURE_CODE, SUCCESS_CODE};
pub use error::{PatternError, Result};
pub use fingerprint::{encode_tokens, fingerprint};
pub use key::{KEY_PREFIX, decode_hex, encode_hex};
pub use lexer::Lexer;
pub use memory::MemoryBucketStore;
pub use ops::{AddedKey, HexEntry, Page, SetMode};
pub use store::{BucketStore, Entry};
pub use token::{GRAMMAR_VERSION, Token};
pub use visibility::{SESSION_MARKERS, is_visible};
