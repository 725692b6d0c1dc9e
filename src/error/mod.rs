//! Unified error handling for sqllexer.
//!
//! Lexing, obfuscation and normalization are fail-soft: malformed SQL never
//! produces an error, it degrades into `IncompleteString`, `Error` or
//! `Unknown` tokens instead. [`SqlLexerError`] therefore only covers broken
//! internal invariants plus the I/O and serialization failures of the
//! command-line front-end.
//!
//! A convenience [`Result<T>`] type alias is re-exported so that callers can
//! write `Result<T>` instead of `std::result::Result<T, SqlLexerError>`.

use thiserror::Error;

/// The canonical error type for all sqllexer operations.
#[derive(Error, Debug)]
pub enum SqlLexerError {
    /// An internal invariant was violated, e.g. the lexer produced a token
    /// that does not start where the previous one ended. This indicates a
    /// bug in sqllexer itself and should be reported.
    #[error("internal error: {0}")]
    Internal(String),

    /// An I/O error while reading SQL text or writing results.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Results could not be rendered as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialised [`Result`] type for sqllexer operations.
pub type Result<T> = std::result::Result<T, SqlLexerError>;
