//! SQL lexer used for fingerprinting.
//!
//! The lexer only classifies tokens; it never parses structure and never
//! fails. Anything it cannot classify comes out as [`LEX_ERROR`] so that
//! malformed statements still get a stable fingerprint.
//!
//! A [`Lexer`] is an [`Iterator`] over [`Token`]s that yields the
//! end-of-input sentinel exactly once and then stops.

use crate::token::{
    self, COMMENT, EOF, GE, ID, LE, LEX_ERROR, LIST_ARG, NE, NULL_SAFE_EQUAL, NUMBER, STRING,
    Token, VALUE_ARG,
};

/// Byte-oriented SQL lexer over a borrowed statement.
pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            src: source.as_bytes(),
            pos: 0,
            finished: false,
        }
    }

    /// Tokenizes the whole statement, including the trailing [`EOF`] token.
    #[must_use]
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    /// Produces the next token. Returns [`EOF`] repeatedly once the input is
    /// exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let Some(ch) = self.peek() else {
            return Token::bare(EOF);
        };

        if is_word_start(ch) {
            return self.lex_word();
        }
        if ch.is_ascii_digit() {
            return self.lex_number();
        }
        if ch == b':' {
            return self.lex_bind_var();
        }

        let start = self.pos;
        self.pos += 1;
        match ch {
            b'=' | b',' | b'(' | b')' | b'+' | b'*' | b'%' | b'&' | b'|' | b'^' | b'~' => {
                Token::bare(u32::from(ch))
            }
            b';' => {
                if self.rest_is_blank() {
                    // Statement terminator.
                    self.pos = self.src.len();
                    Token::bare(EOF)
                } else {
                    Token::bare(u32::from(ch))
                }
            }
            b'?' => Token::new(VALUE_ARG, "?"),
            b'.' => {
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos = start;
                    self.lex_number()
                } else {
                    Token::bare(u32::from(ch))
                }
            }
            b'/' => match self.peek() {
                Some(b'/') => self.lex_line_comment(start),
                Some(b'*') => self.lex_block_comment(start),
                _ => Token::bare(u32::from(ch)),
            },
            b'-' => {
                if self.peek() == Some(b'-') {
                    self.lex_line_comment(start)
                } else {
                    Token::bare(u32::from(ch))
                }
            }
            b'<' => match self.peek() {
                Some(b'>') => {
                    self.pos += 1;
                    Token::bare(NE)
                }
                Some(b'=') => {
                    self.pos += 1;
                    if self.peek() == Some(b'>') {
                        self.pos += 1;
                        Token::bare(NULL_SAFE_EQUAL)
                    } else {
                        Token::bare(LE)
                    }
                }
                _ => Token::bare(u32::from(ch)),
            },
            b'>' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    Token::bare(GE)
                } else {
                    Token::bare(u32::from(ch))
                }
            }
            b'!' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    Token::bare(NE)
                } else {
                    Token::new(LEX_ERROR, "!")
                }
            }
            b'\'' | b'"' => self.lex_string(ch),
            b'`' => self.lex_quoted_identifier(),
            other => Token::new(LEX_ERROR, vec![other]),
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_blank) {
            self.pos += 1;
        }
    }

    fn rest_is_blank(&self) -> bool {
        self.src[self.pos..].iter().copied().all(is_blank)
    }

    fn consume_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        self.pos - start
    }

    // -----------------------------------------------------------------------
    // Token scanners
    // -----------------------------------------------------------------------

    fn lex_word(&mut self) -> Token {
        let start = self.pos;
        self.consume_while(is_word_char);
        let word = &self.src[start..self.pos];
        match token::keyword(&word.to_ascii_lowercase()) {
            Some(kind) => Token::new(kind, word),
            None => Token::new(ID, word),
        }
    }

    fn lex_number(&mut self) -> Token {
        let start = self.pos;

        if self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x' | b'X')) {
            self.pos += 2;
            if self.consume_while(|c| c.is_ascii_hexdigit()) == 0 {
                return Token::new(LEX_ERROR, &self.src[start..self.pos]);
            }
            return Token::new(NUMBER, &self.src[start..self.pos]);
        }

        self.consume_while(|c| c.is_ascii_digit());
        if self.peek() == Some(b'.') {
            self.pos += 1;
            self.consume_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.consume_while(|c| c.is_ascii_digit()) == 0 {
                return Token::new(LEX_ERROR, &self.src[start..self.pos]);
            }
        }
        Token::new(NUMBER, &self.src[start..self.pos])
    }

    fn lex_bind_var(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        let mut kind = VALUE_ARG;
        if self.peek() == Some(b':') {
            kind = LIST_ARG;
            self.pos += 1;
        }
        if !self.peek().is_some_and(is_word_start) {
            return Token::new(LEX_ERROR, &self.src[start..self.pos]);
        }
        self.consume_while(|c| is_word_char(c) || c == b'.');
        Token::new(kind, &self.src[start..self.pos])
    }

    /// Scans a quoted string whose opening quote has been consumed.
    fn lex_string(&mut self, quote: u8) -> Token {
        let mut value = Vec::new();
        loop {
            let Some(ch) = self.peek() else {
                return Token::new(LEX_ERROR, value);
            };
            self.pos += 1;
            if ch == quote {
                if self.peek() == Some(quote) {
                    self.pos += 1;
                    value.push(quote);
                    continue;
                }
                return Token::new(STRING, value);
            }
            if ch == b'\\' {
                let Some(escaped) = self.peek() else {
                    return Token::new(LEX_ERROR, value);
                };
                self.pos += 1;
                value.push(unescape(escaped));
                continue;
            }
            value.push(ch);
        }
    }

    /// Scans a backtick-quoted identifier whose opening backtick has been
    /// consumed.
    fn lex_quoted_identifier(&mut self) -> Token {
        let mut name = Vec::new();
        loop {
            let Some(ch) = self.peek() else {
                return Token::new(LEX_ERROR, name);
            };
            self.pos += 1;
            if ch == b'`' {
                if self.peek() == Some(b'`') {
                    self.pos += 1;
                    name.push(b'`');
                    continue;
                }
                return Token::new(ID, name);
            }
            name.push(ch);
        }
    }

    /// Scans `--` / `//` comments up to and including the newline.
    fn lex_line_comment(&mut self, start: usize) -> Token {
        self.pos += 1;
        self.consume_while(|c| c != b'\n');
        if self.peek() == Some(b'\n') {
            self.pos += 1;
        }
        Token::new(COMMENT, &self.src[start..self.pos])
    }

    fn lex_block_comment(&mut self, start: usize) -> Token {
        self.pos += 1;
        while let Some(ch) = self.peek() {
            self.pos += 1;
            if ch == b'*' && self.peek() == Some(b'/') {
                self.pos += 1;
                return Token::new(COMMENT, &self.src[start..self.pos]);
            }
        }
        Token::new(LEX_ERROR, &self.src[start..self.pos])
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let tok = self.next_token();
        if tok.is_eof() {
            self.finished = true;
        }
        Some(tok)
    }
}

fn is_blank(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\r' | b'\n')
}

fn is_word_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_' || ch == b'@'
}

fn is_word_char(ch: u8) -> bool {
    is_word_start(ch) || ch.is_ascii_digit()
}

fn unescape(ch: u8) -> u8 {
    match ch {
        b'0' => 0,
        b'b' => 0x08,
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        b'Z' => 0x1a,
        other => other,
    }
}
