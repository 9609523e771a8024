//! Token kinds for the fingerprint lexer.
//!
//! The integer value of every kind is part of the stored fingerprint format:
//! single-character operators use their ASCII code, everything else is
//! numbered consecutively from [`LEX_ERROR`]. Renumbering any kind changes the
//! fingerprint of every statement that contains it, so the table is frozen
//! under [`GRAMMAR_VERSION`].

/// Version of the token-kind table below.
///
/// Bump this (and migrate stored fingerprints) whenever a kind value changes.
pub const GRAMMAR_VERSION: u32 = 1;

/// End of input. Never written into a fingerprint.
pub const EOF: u32 = 0;

pub const LEX_ERROR: u32 = 57346;

pub const SELECT: u32 = 57347;
pub const INSERT: u32 = 57348;
pub const UPDATE: u32 = 57349;
pub const DELETE: u32 = 57350;
pub const FROM: u32 = 57351;
pub const WHERE: u32 = 57352;
pub const GROUP: u32 = 57353;
pub const HAVING: u32 = 57354;
pub const ORDER: u32 = 57355;
pub const BY: u32 = 57356;
pub const LIMIT: u32 = 57357;
pub const FOR: u32 = 57358;

pub const ALL: u32 = 57359;
pub const DISTINCT: u32 = 57360;
pub const AS: u32 = 57361;
pub const EXISTS: u32 = 57362;
pub const IN: u32 = 57363;
pub const IS: u32 = 57364;
pub const LIKE: u32 = 57365;
pub const BETWEEN: u32 = 57366;
pub const NULL: u32 = 57367;
pub const ASC: u32 = 57368;
pub const DESC: u32 = 57369;
pub const VALUES: u32 = 57370;
pub const INTO: u32 = 57371;
pub const DUPLICATE: u32 = 57372;
pub const KEY: u32 = 57373;
pub const DEFAULT: u32 = 57374;
pub const SET: u32 = 57375;
pub const LOCK: u32 = 57376;

/// Identifier class: table, column, variable, alias, and function names.
pub const ID: u32 = 57377;
pub const STRING: u32 = 57378;
pub const NUMBER: u32 = 57379;
pub const VALUE_ARG: u32 = 57380;
pub const LIST_ARG: u32 = 57381;
pub const COMMENT: u32 = 57382;

pub const LE: u32 = 57383;
pub const GE: u32 = 57384;
pub const NE: u32 = 57385;
pub const NULL_SAFE_EQUAL: u32 = 57386;

pub const UNION: u32 = 57387;
pub const MINUS: u32 = 57388;
pub const EXCEPT: u32 = 57389;
pub const INTERSECT: u32 = 57390;
pub const JOIN: u32 = 57391;
pub const STRAIGHT_JOIN: u32 = 57392;
pub const LEFT: u32 = 57393;
pub const RIGHT: u32 = 57394;
pub const INNER: u32 = 57395;
pub const OUTER: u32 = 57396;
pub const CROSS: u32 = 57397;
pub const NATURAL: u32 = 57398;
pub const USE: u32 = 57399;
pub const FORCE: u32 = 57400;
pub const ON: u32 = 57401;
pub const OR: u32 = 57402;
pub const AND: u32 = 57403;
pub const NOT: u32 = 57404;
/// Reserved by the grammar for unary precedence; the lexer never emits it.
pub const UNARY: u32 = 57405;
pub const CASE: u32 = 57406;
pub const WHEN: u32 = 57407;
pub const THEN: u32 = 57408;
pub const ELSE: u32 = 57409;
pub const END: u32 = 57410;

pub const CREATE: u32 = 57411;
pub const ALTER: u32 = 57412;
pub const DROP: u32 = 57413;
pub const RENAME: u32 = 57414;
pub const ANALYZE: u32 = 57415;
pub const TABLE: u32 = 57416;
pub const INDEX: u32 = 57417;
pub const VIEW: u32 = 57418;
pub const TO: u32 = 57419;
pub const IGNORE: u32 = 57420;
pub const IF: u32 = 57421;
pub const UNIQUE: u32 = 57422;
pub const USING: u32 = 57423;
pub const SHOW: u32 = 57424;
pub const DESCRIBE: u32 = 57425;
pub const EXPLAIN: u32 = 57426;

/// A single lexical unit.
///
/// `literal` holds the source bytes for words (keywords in their original
/// case as well as identifiers), literals, bind variables, comments, and
/// error bytes; it is empty for operators and end of input. Only identifier
/// bytes reach the fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: u32,
    pub literal: Vec<u8>,
}

impl Token {
    pub fn new(kind: u32, literal: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            literal: literal.into(),
        }
    }

    /// A token that carries only its kind.
    pub fn bare(kind: u32) -> Self {
        Self {
            kind,
            literal: Vec::new(),
        }
    }

    /// Returns `true` for the end-of-input sentinel.
    pub fn is_eof(&self) -> bool {
        self.kind == EOF
    }

    /// Returns `true` for the identifier class, whose bytes are kept verbatim
    /// in fingerprints.
    pub fn is_identifier(&self) -> bool {
        self.kind == ID
    }
}

/// Looks up a keyword kind for an already-lowercased word.
pub fn keyword(word: &[u8]) -> Option<u32> {
    let kind = match word {
        b"all" => ALL,
        b"alter" => ALTER,
        b"analyze" => ANALYZE,
        b"and" => AND,
        b"as" => AS,
        b"asc" => ASC,
        b"between" => BETWEEN,
        b"by" => BY,
        b"case" => CASE,
        b"create" => CREATE,
        b"cross" => CROSS,
        b"default" => DEFAULT,
        b"delete" => DELETE,
        b"desc" => DESC,
        b"describe" => DESCRIBE,
        b"distinct" => DISTINCT,
        b"drop" => DROP,
        b"duplicate" => DUPLICATE,
        b"else" => ELSE,
        b"end" => END,
        b"except" => EXCEPT,
        b"exists" => EXISTS,
        b"explain" => EXPLAIN,
        b"for" => FOR,
        b"force" => FORCE,
        b"from" => FROM,
        b"group" => GROUP,
        b"having" => HAVING,
        b"if" => IF,
        b"ignore" => IGNORE,
        b"in" => IN,
        b"index" => INDEX,
        b"inner" => INNER,
        b"insert" => INSERT,
        b"intersect" => INTERSECT,
        b"into" => INTO,
        b"is" => IS,
        b"join" => JOIN,
        b"key" => KEY,
        b"left" => LEFT,
        b"like" => LIKE,
        b"limit" => LIMIT,
        b"lock" => LOCK,
        b"minus" => MINUS,
        b"natural" => NATURAL,
        b"not" => NOT,
        b"null" => NULL,
        b"on" => ON,
        b"or" => OR,
        b"order" => ORDER,
        b"outer" => OUTER,
        b"rename" => RENAME,
        b"right" => RIGHT,
        b"select" => SELECT,
        b"set" => SET,
        b"show" => SHOW,
        b"straight_join" => STRAIGHT_JOIN,
        b"table" => TABLE,
        b"then" => THEN,
        b"to" => TO,
        b"union" => UNION,
        b"unique" => UNIQUE,
        b"update" => UPDATE,
        b"use" => USE,
        b"using" => USING,
        b"values" => VALUES,
        b"view" => VIEW,
        b"when" => WHEN,
        b"where" => WHERE,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_frozen() {
        assert_eq!(SELECT, 0xe003);
        assert_eq!(FROM, 0xe007);
        assert_eq!(WHERE, 0xe008);
        assert_eq!(LIMIT, 0xe00d);
        assert_eq!(NUMBER, 0xe023);
        assert_eq!(EXPLAIN - LEX_ERROR, 80);
    }

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(keyword(b"select"), Some(SELECT));
        assert_eq!(keyword(b"straight_join"), Some(STRAIGHT_JOIN));
        assert_eq!(keyword(b"first"), None);
        // Lookup expects lowercase input.
        assert_eq!(keyword(b"SELECT"), None);
    }

    #[test]
    fn test_token_classification() {
        assert!(Token::bare(EOF).is_eof());
        assert!(Token::new(ID, "users").is_identifier());
        assert!(!Token::new(STRING, "users").is_identifier());
    }
}
