//! Filter for session-scoped keys.
//!
//! The firewall keeps per-client and per-user entries in the same buckets as
//! learned patterns. Their keys embed one of [`SESSION_MARKERS`] and they are
//! never surfaced by inspection.

/// Substrings that mark a key as session-scoped.
pub const SESSION_MARKERS: [&[u8]; 2] = [b"_client_", b"_user_"];

/// Returns `true` unless `key` contains a session marker.
#[must_use]
pub fn is_visible(key: &[u8]) -> bool {
    !SESSION_MARKERS
        .iter()
        .any(|marker| key.windows(marker.len()).any(|window| window == *marker))
}
