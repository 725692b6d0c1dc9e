//! Output formatting for normalized SQL: token spacing and placeholder
//! grouping.

use std::sync::LazyLock;

use regex::Regex;

use crate::sql::TokenKind;

static GROUPED_PARENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\?(?:\s*,\s*\?)*\s*\)").unwrap());

static GROUPED_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\s*\?(?:\s*,\s*\?)*\s*\]").unwrap());

/// Collapse parenthesized or bracketed lists made only of `?` placeholders
/// into `( ? )` / `[ ? ]`.
pub fn group_placeholders(sql: &str) -> String {
    let grouped = GROUPED_PARENS.replace_all(sql, "( ? )");
    GROUPED_BRACKETS.replace_all(&grouped, "[ ? ]").into_owned()
}

/// Joins rendered tokens with single spaces.
///
/// A `,` attaches to the token before it. A `.` that follows an identifier
/// attaches to both neighbours, keeping qualified names like `s.t` or
/// `"s"."t"` intact. The output depends only on the sequence of
/// `(kind, text)` pairs pushed, so re-rendering rendered text is stable.
#[derive(Debug, Default)]
pub(crate) struct SqlWriter {
    out: String,
    last_kind: Option<TokenKind>,
    after_qualifier_dot: bool,
}

impl SqlWriter {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        SqlWriter {
            out: String::with_capacity(capacity),
            ..Default::default()
        }
    }

    pub(crate) fn push(&mut self, kind: TokenKind, text: &str) {
        let is_punct = kind == TokenKind::Punctuation;
        let qualifier_dot = is_punct
            && text == "."
            && matches!(
                self.last_kind,
                Some(TokenKind::Ident) | Some(TokenKind::QuotedIdent)
            );
        let attach = self.out.is_empty()
            || (is_punct && text == ",")
            || qualifier_dot
            || self.after_qualifier_dot;

        if !attach {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.last_kind = Some(kind);
        self.after_qualifier_dot = qualifier_dot;
    }

    /// Group placeholders and trim the rendered text.
    pub(crate) fn finish(self) -> String {
        group_placeholders(&self.out).trim().to_string()
    }
}
