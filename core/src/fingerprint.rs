//! Structural fingerprints of SQL statements.
//!
//! A fingerprint keeps identifier bytes verbatim and replaces every other
//! token with the big-endian bytes of its kind, so statements that only
//! differ in literal values map to the same key.
//!
//! # Examples
//!
//! ```
//! use pattern_store_core::{encode_hex, fingerprint};
//!
//! let a = fingerprint("select * from users where id = 1");
//! let b = fingerprint("SELECT * FROM users WHERE id = 42");
//! assert_eq!(a, b);
//!
//! assert_eq!(
//!     encode_hex(&fingerprint("select * from first")),
//!     "0x0000e0030000002a0000e0076669727374",
//! );
//! ```

use crate::lexer::Lexer;
use crate::token::Token;

/// Computes the fingerprint of a SQL statement.
#[must_use]
pub fn fingerprint(sql: &str) -> Vec<u8> {
    encode_tokens(Lexer::new(sql))
}

/// Encodes a token stream into fingerprint bytes.
///
/// Stops at the first end-of-input token; anything after it is ignored.
pub fn encode_tokens(tokens: impl IntoIterator<Item = Token>) -> Vec<u8> {
    let mut buf = Vec::new();
    for tok in tokens {
        if tok.is_eof() {
            break;
        }
        if tok.is_identifier() {
            buf.extend_from_slice(&tok.literal);
        } else {
            buf.extend_from_slice(&tok.kind.to_be_bytes());
        }
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::encode_hex;
    use crate::token::{EOF, ID, SELECT};

    #[test]
    fn test_documented_fingerprints() {
        assert_eq!(
            encode_hex(&fingerprint("select * from first")),
            "0x0000e0030000002a0000e0076669727374"
        );
        assert_eq!(
            encode_hex(&fingerprint("select * from first where name<100")),
            "0x0000e0030000002a0000e00766697273740000e0086e616d650000003c0000e023"
        );
        assert_eq!(
            encode_hex(&fingerprint("select @@version_comment limit 1")),
            "0x0000e003404076657273696f6e5f636f6d6d656e740000e00d0000e023"
        );
    }

    #[test]
    fn test_terminator_does_not_change_fingerprint() {
        assert_eq!(
            fingerprint("select * from first;"),
            fingerprint("select * from first")
        );
    }

    #[test]
    fn test_literals_collapse() {
        let cases = [
            (
                "select name from users where id = 1",
                "select name from users where id = 987654",
            ),
            (
                "insert into t (a, b) values ('x', 2.5)",
                "insert into t (a, b) values (\"a much longer string\", 1e9)",
            ),
            (
                "select * from t where a in (1, 2) and b like 'x%'",
                "SELECT *\n  FROM t\n WHERE a IN (0x1f, 7) AND b LIKE '%y'",
            ),
        ];
        for (a, b) in cases {
            assert_eq!(fingerprint(a), fingerprint(b), "{a} vs {b}");
        }
    }

    #[test]
    fn test_structure_changes_fingerprint() {
        let base = fingerprint("select a from t where b = 1");
        assert_ne!(base, fingerprint("select a from t where b > 1"));
        assert_ne!(base, fingerprint("select a from u where b = 1"));
        assert_ne!(base, fingerprint("select a from t where b = 1 or 1 = 1"));
        assert_ne!(base, fingerprint("select a from t where b = 1; drop table t"));
    }

    #[test]
    fn test_identifier_case_is_preserved() {
        assert_ne!(fingerprint("select * from Users"), fingerprint("select * from users"));
    }

    #[test]
    fn test_keyword_only_statement_is_not_empty() {
        let fp = fingerprint("select");
        assert_eq!(fp, SELECT.to_be_bytes().to_vec());
        assert!(fingerprint("").is_empty());
    }

    #[test]
    fn test_malformed_sql_still_encodes() {
        let fp = fingerprint("select 'unterminated");
        assert_eq!(fp.len(), 8);
        assert_eq!(&fp[4..], &crate::token::LEX_ERROR.to_be_bytes());
    }

    #[test]
    fn test_encode_tokens_stops_at_eof() {
        let tokens = vec![
            Token::new(ID, "a"),
            Token::bare(EOF),
            Token::new(ID, "ignored"),
        ];
        assert_eq!(encode_tokens(tokens), b"a".to_vec());
    }
}
