//! Lexical front-end for sqllexer.
//!
//! This module contains the token model, the fail-soft lexer that turns raw
//! SQL text into a lossless token stream, and the static keyword tables the
//! normalizer consults.

pub mod keywords;
pub mod lexer;
pub mod token;

pub use lexer::{scan, Lexer};
pub use token::{Token, TokenKind};
