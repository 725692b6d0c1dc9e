//! Hand-written, fail-soft SQL tokenizer.
//!
//! The [`Lexer`] is a pull iterator over [`Token`]s borrowed from the input.
//! It never fails: malformed or truncated input degrades into
//! `IncompleteString`, `Error` or `Unknown` tokens, and concatenating every
//! token's text reproduces the input byte for byte.

use tracing::trace;

use crate::sql::token::{Token, TokenKind};

/// Multi-character operators, longest first so that the first prefix match
/// is the longest one.
const MULTI_CHAR_OPERATORS: &[&str] = &[
    "<=>", "->>", "#>>", "<=", ">=", "<>", "!=", "==", "||", "&&", "<<", ">>", "->", "#>", "#-",
    "@>", "<@", "::", ":=", "!~", "~*",
];

/// Build a lexer over `input`.
pub fn scan(input: &str) -> Lexer<'_> {
    Lexer::new(input)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || (!c.is_ascii() && c.is_alphabetic())
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '?'
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

/// A single forward pass over SQL text.
///
/// Create one with [`Lexer::new`] and iterate it, or call
/// [`Lexer::scan_all`] to collect the full token list.
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Kind of the token that ended exactly at `pos`.
    prev_kind: Option<TokenKind>,
    /// Last token that was neither whitespace nor a comment.
    prev_significant: Option<Token<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over the given SQL text.
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            prev_kind: None,
            prev_significant: None,
        }
    }

    /// Tokenize the remaining input and return the token list.
    pub fn scan_all(self) -> Vec<Token<'a>> {
        self.collect()
    }

    // -- helpers ------------------------------------------------------------

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    fn rest(&self) -> &'a str {
        self.input.get(self.pos..).unwrap_or("")
    }

    /// Position of the next `needle` byte at or after `from`.
    fn find_byte(&self, from: usize, needle: u8) -> Option<usize> {
        self.bytes
            .get(from..)?
            .iter()
            .position(|&b| b == needle)
            .map(|i| from + i)
    }

    fn consume_digits(&mut self) {
        while self.peek_at(0).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn consume_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek_char() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    // -- main scanner -------------------------------------------------------

    /// Scan one token starting at `pos`, advancing past it.
    fn scan_token(&mut self) -> TokenKind {
        let ch = match self.peek_char() {
            Some(c) => c,
            None => return TokenKind::Error,
        };

        match ch {
            c if c.is_whitespace() => {
                self.consume_while(char::is_whitespace);
                TokenKind::Whitespace
            }
            '\'' => self.scan_string(),
            '"' | '`' => self.scan_quoted_identifier(ch as u8),
            '-' if self.peek_at(1) == Some(b'-') => self.scan_line_comment(),
            '/' if self.peek_at(1) == Some(b'*') => self.scan_block_comment(),
            '$' => self.scan_dollar(),
            '?' => {
                self.pos += 1;
                self.consume_digits();
                TokenKind::Operator
            }
            '.' if self.starts_fraction() => self.scan_number(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_ident_start(c) => {
                self.consume_while(is_ident_continue);
                TokenKind::Ident
            }
            '*' => {
                self.pos += 1;
                self.classify_star()
            }
            '(' | ')' | '[' | ']' | '{' | '}' | ',' | ';' | '.' => {
                self.pos += 1;
                TokenKind::Punctuation
            }
            _ => self.scan_operator(ch),
        }
    }

    // -- literal readers ----------------------------------------------------

    fn scan_string(&mut self) -> TokenKind {
        let start = self.pos;
        self.pos += 1; // opening '
        loop {
            match self.find_byte(self.pos, b'\'') {
                None => {
                    trace!(offset = start, "unterminated string literal");
                    self.pos = self.bytes.len();
                    return TokenKind::IncompleteString;
                }
                Some(i) if self.bytes.get(i + 1) == Some(&b'\'') => {
                    // Doubled quote escapes itself.
                    self.pos = i + 2;
                }
                Some(i) => {
                    self.pos = i + 1;
                    return TokenKind::String;
                }
            }
        }
    }

    fn scan_quoted_identifier(&mut self, delimiter: u8) -> TokenKind {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.find_byte(self.pos, delimiter) {
                None => {
                    trace!(offset = start, "unterminated quoted identifier");
                    self.pos = self.bytes.len();
                    return TokenKind::Error;
                }
                Some(i) if self.bytes.get(i + 1) == Some(&delimiter) => {
                    self.pos = i + 2;
                }
                Some(i) => {
                    self.pos = i + 1;
                    return TokenKind::QuotedIdent;
                }
            }
        }
    }

    /// A `.` directly followed by a digit starts a number, unless it
    /// qualifies the identifier right before it (`t.5`).
    fn starts_fraction(&self) -> bool {
        self.peek_at(1).is_some_and(|b| b.is_ascii_digit())
            && !matches!(
                self.prev_kind,
                Some(TokenKind::Ident) | Some(TokenKind::QuotedIdent)
            )
    }

    fn scan_number(&mut self) -> TokenKind {
        // Hexadecimal 0x1F
        if self.peek_at(0) == Some(b'0')
            && matches!(self.peek_at(1), Some(b'x') | Some(b'X'))
            && self.peek_at(2).is_some_and(|b| b.is_ascii_hexdigit())
        {
            self.pos += 2;
            while self.peek_at(0).is_some_and(|b| b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            return TokenKind::Number;
        }

        // Integer part
        self.consume_digits();

        // Fractional part, including a bare trailing dot as in `123.`
        if self.peek_at(0) == Some(b'.') {
            self.pos += 1;
            self.consume_digits();
        }

        // Exponent part, only when digits actually follow.
        if matches!(self.peek_at(0), Some(b'e') | Some(b'E')) {
            let digits_at = match self.peek_at(1) {
                Some(b'+') | Some(b'-') => 2,
                _ => 1,
            };
            if self.peek_at(digits_at).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += digits_at;
                self.consume_digits();
            }
        }

        TokenKind::Number
    }

    fn scan_line_comment(&mut self) -> TokenKind {
        let rest = &self.bytes[self.pos..];
        let len = rest
            .iter()
            .position(|&b| b == b'\n' || b == b'\r')
            .unwrap_or(rest.len());
        self.pos += len;
        TokenKind::Comment
    }

    fn scan_block_comment(&mut self) -> TokenKind {
        let body = self.pos + 2;
        match self.input.get(body..).and_then(|rest| rest.find("*/")) {
            Some(i) => self.pos = body + i + 2,
            None => {
                trace!(offset = self.pos, "unterminated block comment");
                self.pos = self.bytes.len();
            }
        }
        TokenKind::MultilineComment
    }

    /// `$1` bind parameters and `$tag$ ... $tag$` quoted bodies.
    fn scan_dollar(&mut self) -> TokenKind {
        let start = self.pos;

        if self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
            self.consume_digits();
            return TokenKind::Operator;
        }

        let tag_len = self.bytes[start + 1..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count();
        if self.bytes.get(start + 1 + tag_len) != Some(&b'$') {
            self.pos += 1;
            trace!(offset = start, "stray dollar sign");
            return TokenKind::Unknown;
        }

        let body = start + tag_len + 2;
        let delimiter = &self.input[start..body];
        match self.input[body..].find(delimiter) {
            Some(i) => {
                self.pos = body + i + delimiter.len();
                if delimiter == "$func$" {
                    TokenKind::DollarQuotedFunction
                } else {
                    TokenKind::DollarQuotedString
                }
            }
            None => {
                trace!(offset = start, delimiter, "unterminated dollar-quoted string");
                self.pos = self.bytes.len();
                TokenKind::IncompleteString
            }
        }
    }

    // -- operators ------------------------------------------------------------

    /// `*` is a wildcard at the start of a select list, after `(`, `,` or
    /// `.`, and after a keyword such as `SELECT` or `RETURNING`. Everywhere
    /// else it multiplies.
    fn classify_star(&self) -> TokenKind {
        match &self.prev_significant {
            None => TokenKind::Wildcard,
            Some(prev) if prev.is_punct("(") || prev.is_punct(",") || prev.is_punct(".") => {
                TokenKind::Wildcard
            }
            Some(prev) if prev.is_keyword() => TokenKind::Wildcard,
            Some(_) => TokenKind::Operator,
        }
    }

    fn scan_operator(&mut self, ch: char) -> TokenKind {
        let rest = self.rest();
        if let Some(op) = MULTI_CHAR_OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            self.pos += op.len();
            return TokenKind::Operator;
        }

        self.pos += ch.len_utf8();
        match ch {
            ':' => TokenKind::Punctuation,
            '+' | '-' | '/' | '%' | '=' | '<' | '>' | '!' | '|' | '&' | '^' | '~' | '@' | '#' => {
                TokenKind::Operator
            }
            _ => {
                trace!(offset = self.pos - ch.len_utf8(), character = %ch, "unrecognized character");
                TokenKind::Unknown
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.pos >= self.bytes.len() {
            return None;
        }

        let start = self.pos;
        let mut kind = self.scan_token();
        if self.pos <= start {
            // Every rule consumes input; guard the loop regardless.
            self.pos = start + self.peek_char().map_or(1, char::len_utf8);
            kind = TokenKind::Error;
        }

        let text = match self.input.get(start..self.pos) {
            Some(text) => text,
            None => {
                self.pos = self.bytes.len();
                kind = TokenKind::Error;
                self.input.get(start..).unwrap_or("")
            }
        };

        let token = Token::new(kind, text, start);
        self.prev_kind = Some(kind);
        if token.is_significant() {
            self.prev_significant = Some(token);
        }
        Some(token)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
