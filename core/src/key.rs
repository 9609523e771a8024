//! Text form of binary store keys.
//!
//! Keys are shown and accepted as `0x` followed by lowercase hex digits.

use crate::error::{PatternError, Result};

/// Prefix carried by every textual key.
pub const KEY_PREFIX: &str = "0x";

/// Renders a binary key as `0x`-prefixed lowercase hex.
///
/// ```
/// use pattern_store_core::encode_hex;
///
/// assert_eq!(encode_hex(b"first"), "0x6669727374");
/// assert_eq!(encode_hex(&[]), "0x");
/// ```
#[must_use]
pub fn encode_hex(key: &[u8]) -> String {
    format!("{KEY_PREFIX}{}", hex::encode(key))
}

/// Parses a `0x`-prefixed hex key back into bytes.
///
/// # Errors
///
/// Returns [`PatternError::BadKeyPrefix`] if the text does not start with
/// `0x`, and [`PatternError::MalformedHex`] if the remainder has odd length or
/// contains a non-hex digit.
pub fn decode_hex(text: &str) -> Result<Vec<u8>> {
    let digits = text
        .strip_prefix(KEY_PREFIX)
        .ok_or_else(|| PatternError::BadKeyPrefix(text.to_string()))?;
    hex::decode(digits).map_err(|err| PatternError::MalformedHex {
        key: text.to_string(),
        reason: err.to_string(),
    })
}
