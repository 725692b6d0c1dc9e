//! Token model shared by the lexer, the obfuscator and the normalizer.

use crate::sql::keywords;

/// Lexical category of a [`Token`].
///
/// The set is closed: every byte of input ends up in exactly one token of
/// one of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Integer, decimal, exponent or hex literal. Never includes a sign.
    Number,
    /// A `'...'` literal including its quotes.
    String,
    /// A `'...` literal (or dollar-quoted body) cut off by end of input.
    IncompleteString,
    /// Bare identifier or keyword.
    Ident,
    /// A `"..."` or `` `...` `` identifier including its quotes.
    QuotedIdent,
    /// `-- ...` up to, but excluding, the end of line.
    Comment,
    /// `/* ... */`, or an unterminated `/* ...` running to end of input.
    MultilineComment,
    /// `$tag$ ... $tag$` for any tag other than `func`.
    DollarQuotedString,
    /// `$func$ ... $func$`, whose body is itself SQL.
    DollarQuotedFunction,
    /// Structural characters: `( ) [ ] { } , ; . :`.
    Punctuation,
    /// Expression operators and bind markers (`?`, `?1`, `$1`).
    Operator,
    /// `*` in a select-list position.
    Wildcard,
    Whitespace,
    /// Unterminated quoted identifier.
    Error,
    /// A character no other rule matched.
    Unknown,
}

impl TokenKind {
    /// Kinds emitted for input the lexer could not make sense of. Consumers
    /// pass them through instead of failing.
    pub fn is_fail_soft(self) -> bool {
        matches!(self, TokenKind::Error | TokenKind::Unknown)
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::MultilineComment)
    }

    /// Kinds that carry a literal value.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Number
                | TokenKind::String
                | TokenKind::IncompleteString
                | TokenKind::DollarQuotedString
        )
    }
}

/// A classified, positioned slice of the input.
///
/// `text` always equals `&input[start..end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, start: usize) -> Self {
        Token {
            kind,
            text,
            start,
            end: start + text.len(),
        }
    }

    /// Whether the token matters to the shape of the statement, i.e. it is
    /// neither whitespace nor a comment.
    pub fn is_significant(&self) -> bool {
        self.kind != TokenKind::Whitespace && !self.kind.is_comment()
    }

    /// Whether this is an identifier matching a recognized SQL keyword.
    pub fn is_keyword(&self) -> bool {
        self.kind == TokenKind::Ident && keywords::is_keyword(self.text)
    }

    /// Whether this is the punctuation character `ch`.
    pub fn is_punct(&self, ch: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == ch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_offset_follows_text_length() {
        let tok = Token::new(TokenKind::Ident, "users", 14);
        assert_eq!(tok.start, 14);
        assert_eq!(tok.end, 19);
    }

    #[test]
    fn fail_soft_kinds() {
        assert!(TokenKind::Error.is_fail_soft());
        assert!(TokenKind::Unknown.is_fail_soft());
        assert!(!TokenKind::IncompleteString.is_fail_soft());
    }

    #[test]
    fn keyword_detection_is_case_insensitive() {
        assert!(Token::new(TokenKind::Ident, "select", 0).is_keyword());
        assert!(Token::new(TokenKind::Ident, "FrOm", 0).is_keyword());
        assert!(!Token::new(TokenKind::Ident, "users", 0).is_keyword());
        assert!(!Token::new(TokenKind::QuotedIdent, "\"select\"", 0).is_keyword());
    }

    #[test]
    fn significance() {
        assert!(!Token::new(TokenKind::Whitespace, " ", 0).is_significant());
        assert!(!Token::new(TokenKind::Comment, "-- x", 0).is_significant());
        assert!(Token::new(TokenKind::Punctuation, ",", 0).is_significant());
    }
}
