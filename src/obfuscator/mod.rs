//! Literal obfuscation.
//!
//! The [`Obfuscator`] makes one pass over the lexer's token stream and
//! replaces every literal value with the `?` placeholder, producing SQL text
//! that is safe to log. It never fails: tokens it cannot classify are passed
//! through with their whitespace collapsed.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sql::{Lexer, TokenKind};

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

const FUNC_DELIMITER: &str = "$func$";

/// Options controlling [`Obfuscator`] output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObfuscatorConfig {
    /// Replace digit runs inside identifiers, e.g. `table_1` becomes `table_?`.
    pub replace_digits: bool,
}

impl ObfuscatorConfig {
    pub fn with_replace_digits(mut self, replace_digits: bool) -> Self {
        self.replace_digits = replace_digits;
        self
    }
}

/// Replaces literal values in SQL text with `?`.
#[derive(Debug, Clone, Default)]
pub struct Obfuscator {
    config: ObfuscatorConfig,
}

impl Obfuscator {
    pub fn new(config: ObfuscatorConfig) -> Self {
        Obfuscator { config }
    }

    pub fn config(&self) -> &ObfuscatorConfig {
        &self.config
    }

    /// Obfuscate `input`, returning the rewritten text with surrounding
    /// whitespace trimmed.
    pub fn obfuscate(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());

        for token in Lexer::new(input) {
            match token.kind {
                kind if kind.is_literal() => out.push('?'),
                TokenKind::Ident => {
                    if is_boolean_or_null(token.text) {
                        out.push('?');
                    } else if self.config.replace_digits {
                        out.push_str(&DIGITS.replace_all(token.text, "?"));
                    } else {
                        out.push_str(token.text);
                    }
                }
                TokenKind::Comment => {
                    // The result may be joined onto one line, where a line
                    // comment would swallow everything after it.
                    out.push_str("/*");
                    out.push_str(token.text.strip_prefix("--").unwrap_or(token.text));
                    out.push_str(" */");
                }
                TokenKind::MultilineComment => out.push_str(&collapse_whitespace(token.text)),
                TokenKind::DollarQuotedFunction => {
                    let body = token
                        .text
                        .strip_prefix(FUNC_DELIMITER)
                        .and_then(|rest| rest.strip_suffix(FUNC_DELIMITER))
                        .unwrap_or("");
                    out.push_str(FUNC_DELIMITER);
                    out.push_str(&self.obfuscate(body));
                    out.push_str(FUNC_DELIMITER);
                }
                kind if kind.is_fail_soft() => out.push_str(&collapse_whitespace(token.text)),
                _ => out.push_str(token.text),
            }
        }

        let obfuscated = out.trim().to_string();
        debug!(
            input_len = input.len(),
            output_len = obfuscated.len(),
            "obfuscated SQL"
        );
        obfuscated
    }
}

fn is_boolean_or_null(word: &str) -> bool {
    word.eq_ignore_ascii_case("null")
        || word.eq_ignore_ascii_case("true")
        || word.eq_ignore_ascii_case("false")
}

/// Replace every whitespace run with a single space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obfuscate(input: &str) -> String {
        Obfuscator::default().obfuscate(input)
    }

    #[test]
    fn literals_become_placeholders() {
        let cases = [
            ("SELECT * FROM users WHERE id = 1", "SELECT * FROM users WHERE id = ?"),
            ("SELECT * FROM users WHERE name = 'Alice'", "SELECT * FROM users WHERE name = ?"),
            ("SELECT 1.5e3, -42", "SELECT ?, -?"),
            ("SELECT $$secret$$", "SELECT ?"),
            ("SELECT * FROM t WHERE a IS NULL OR b = true OR c = FALSE", "SELECT * FROM t WHERE a IS ? OR b = ? OR c = ?"),
        ];
        for (input, expected) in cases {
            assert_eq!(obfuscate(input), expected, "input: {input}");
        }
    }

    #[test]
    fn truncated_string_is_still_redacted() {
        assert_eq!(
            obfuscate("SELECT * FROM users WHERE name = 'Ali"),
            "SELECT * FROM users WHERE name = ?"
        );
    }

    #[test]
    fn identifiers_keep_digits_by_default() {
        assert_eq!(obfuscate("SELECT * FROM table_1"), "SELECT * FROM table_1");
    }

    #[test]
    fn replace_digits_in_identifiers() {
        let obfuscator = Obfuscator::new(ObfuscatorConfig::default().with_replace_digits(true));
        assert_eq!(
            obfuscator.obfuscate("SELECT * FROM table_1 JOIN t2022_q3 ON x = 7"),
            "SELECT * FROM table_? JOIN t?_q? ON x = ?"
        );
    }

    #[test]
    fn quoted_identifiers_are_untouched() {
        assert_eq!(
            obfuscate(r#"SELECT "col_1" FROM "public"."users""#),
            r#"SELECT "col_1" FROM "public"."users""#
        );
    }

    #[test]
    fn line_comments_become_block_comments() {
        assert_eq!(
            obfuscate("SELECT 1 -- pick one\nFROM dual"),
            "SELECT ? /* pick one */\nFROM dual"
        );
    }

    #[test]
    fn multiline_comments_are_collapsed() {
        assert_eq!(
            obfuscate("/* first\n\tsecond */ SELECT 1"),
            "/* first second */ SELECT ?"
        );
    }

    #[test]
    fn dollar_quoted_function_body_is_obfuscated() {
        assert_eq!(
            obfuscate("SELECT $func$INSERT INTO t VALUES ('a', 1)$func$"),
            "SELECT $func$INSERT INTO t VALUES (?, ?)$func$"
        );
    }

    #[test]
    fn fail_soft_tokens_pass_through() {
        assert_eq!(
            obfuscate("SELECT \"unterminated\n  ident"),
            "SELECT \"unterminated ident"
        );
        assert_eq!(obfuscate("SELECT € FROM t"), "SELECT € FROM t");
    }

    #[test]
    fn obfuscation_is_idempotent() {
        for input in [
            "SELECT * FROM users WHERE id IN (1, 2, 3) AND name = 'x'",
            "UPDATE t SET a = $$v$$ WHERE b = 1e5 -- note",
            "SELECT $func$SELECT 'x'$func$",
        ] {
            let once = obfuscate(input);
            assert_eq!(obfuscate(&once), once);
        }
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(obfuscate("\n\t SELECT 1 \n"), "SELECT ?");
    }

    #[test]
    fn empty_input() {
        assert_eq!(obfuscate(""), "");
    }
}
