//! # sqllexer
//!
//! A fail-soft SQL lexer with two consumers built on top of it:
//!
//! - the [`Obfuscator`] replaces every literal value with `?`, producing
//!   text that is safe to log;
//! - the [`Normalizer`] rewrites a statement into a canonical shape
//!   (uppercase keywords, no comments, no `AS` aliases, single spacing,
//!   grouped placeholder lists) and extracts [`StatementMetadata`].
//!
//! Neither ever rejects its input. Truncated strings, unterminated comments
//! and unknown characters all still produce usable output.
//!
//! ```
//! use sqllexer::{NormalizerConfig, ObfuscatorConfig};
//!
//! let obfuscated = sqllexer::obfuscate(
//!     "SELECT * FROM users WHERE id IN (1, 2)",
//!     &ObfuscatorConfig::default(),
//! );
//! assert_eq!(obfuscated, "SELECT * FROM users WHERE id IN (?, ?)");
//!
//! let config = NormalizerConfig::default().with_collect_tables(true);
//! let (normalized, metadata) = sqllexer::normalize(&obfuscated, &config).unwrap();
//! assert_eq!(normalized, "SELECT * FROM users WHERE id IN ( ? )");
//! assert_eq!(metadata.tables, vec!["users"]);
//! ```

pub mod error;
pub mod normalizer;
pub mod obfuscator;
pub mod sql;

pub use error::{Result, SqlLexerError};
pub use normalizer::{Normalizer, NormalizerConfig, StatementMetadata};
pub use obfuscator::{Obfuscator, ObfuscatorConfig};
pub use sql::{Lexer, Token, TokenKind};

/// Replace every literal value in `sql` with `?`.
pub fn obfuscate(sql: &str, config: &ObfuscatorConfig) -> String {
    Obfuscator::new(*config).obfuscate(sql)
}

/// Normalize `sql` and extract its metadata.
pub fn normalize(sql: &str, config: &NormalizerConfig) -> Result<(String, StatementMetadata)> {
    Normalizer::new(*config).normalize(sql)
}

/// Obfuscate `sql`, then normalize the obfuscated text.
///
/// This is the usual pipeline for query fingerprinting: the result carries
/// no literal values and groups statements by shape.
pub fn obfuscate_and_normalize(
    sql: &str,
    obfuscator_config: &ObfuscatorConfig,
    normalizer_config: &NormalizerConfig,
) -> Result<(String, StatementMetadata)> {
    let obfuscated = obfuscate(sql, obfuscator_config);
    normalize(&obfuscated, normalizer_config)
}
