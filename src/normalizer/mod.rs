//! Query normalization.
//!
//! The [`Normalizer`] rebuilds SQL text from the lexer's token stream under
//! keyword-aware rewriting rules so that statements differing only in
//! literal values, aliases, comments, casing or whitespace normalize to the
//! same string. While doing so it extracts [`StatementMetadata`]: the tables
//! the statement reads or writes, its command keywords and its comments.
//!
//! Normalization is idempotent: feeding normalized text back in returns the
//! same text, tables and commands (and no comments, since those were already
//! stripped).

mod format;
mod metadata;

pub use format::group_placeholders;
pub use metadata::StatementMetadata;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SqlLexerError};
use crate::sql::{keywords, Lexer, Token, TokenKind};
use format::SqlWriter;

/// Options controlling [`Normalizer`] output and metadata collection.
///
/// Every flag defaults to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Record comments in [`StatementMetadata::comments`].
    pub collect_comments: bool,
    /// Record command keywords in [`StatementMetadata::commands`].
    pub collect_commands: bool,
    /// Record referenced tables in [`StatementMetadata::tables`].
    pub collect_tables: bool,
    /// Keep `AS alias` in the normalized text instead of dropping it.
    pub keep_sql_alias: bool,
}

impl NormalizerConfig {
    pub fn with_collect_comments(mut self, collect_comments: bool) -> Self {
        self.collect_comments = collect_comments;
        self
    }

    pub fn with_collect_commands(mut self, collect_commands: bool) -> Self {
        self.collect_commands = collect_commands;
        self
    }

    pub fn with_collect_tables(mut self, collect_tables: bool) -> Self {
        self.collect_tables = collect_tables;
        self
    }

    pub fn with_keep_sql_alias(mut self, keep_sql_alias: bool) -> Self {
        self.keep_sql_alias = keep_sql_alias;
        self
    }
}

/// Normalizes SQL text and extracts statement metadata.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Normalizer { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize `input`, returning the normalized text and the metadata
    /// collected along the way.
    ///
    /// Malformed or truncated SQL is normalized on a best-effort basis and
    /// never produces an error. An error is only returned if the lexer
    /// breaks its own coverage invariant.
    pub fn normalize(&self, input: &str) -> Result<(String, StatementMetadata)> {
        let mut pass = NormalizePass::new(self.config, input.len());
        let mut offset = 0;

        for token in Lexer::new(input) {
            if token.start != offset {
                return Err(SqlLexerError::Internal(format!(
                    "token {:?} starts at byte {} but the previous token ended at byte {}",
                    token.kind, token.start, offset
                )));
            }
            offset = token.end;
            pass.accept(token);
        }
        if offset != input.len() {
            return Err(SqlLexerError::Internal(format!(
                "lexer stopped at byte {offset} of {}",
                input.len()
            )));
        }

        let (normalized, metadata) = pass.finish();
        debug!(
            input_len = input.len(),
            output_len = normalized.len(),
            tables = metadata.tables.len(),
            commands = metadata.commands.len(),
            comments = metadata.comments.len(),
            "normalized SQL"
        );
        Ok((normalized, metadata))
    }
}

// ---------------------------------------------------------------------------
// Single normalization pass
// ---------------------------------------------------------------------------

/// Progress of table-name extraction.
#[derive(Debug)]
enum TableState {
    Idle,
    /// A table indicator (`FROM`, `JOIN`, ...) was seen; the next
    /// identifier starts a qualified name.
    Expecting,
    /// Assembling a qualified name segment by segment.
    Collecting { name: String, after_dot: bool },
}

struct NormalizePass<'a> {
    config: NormalizerConfig,
    writer: SqlWriter,
    metadata: StatementMetadata,
    tables: TableState,
    /// An `AS` held back until we know whether an alias name follows it.
    pending_alias: Option<Token<'a>>,
    /// One entry per open parenthesis: whether it opened a `CAST(`.
    parens: Vec<bool>,
    prev_significant: Option<Token<'a>>,
}

impl<'a> NormalizePass<'a> {
    fn new(config: NormalizerConfig, input_len: usize) -> Self {
        NormalizePass {
            config,
            writer: SqlWriter::with_capacity(input_len),
            metadata: StatementMetadata::default(),
            tables: TableState::Idle,
            pending_alias: None,
            parens: Vec::new(),
            prev_significant: None,
        }
    }

    fn accept(&mut self, token: Token<'a>) {
        match token.kind {
            TokenKind::Whitespace => return,
            TokenKind::Comment | TokenKind::MultilineComment => {
                if self.config.collect_comments {
                    self.metadata.add_comment(token.text);
                }
                return;
            }
            _ => {}
        }

        if let Some(as_keyword) = self.pending_alias.take() {
            if is_alias_name(&token) {
                self.prev_significant = Some(token);
                return;
            }
            self.emit(&as_keyword);
        }

        if self.config.collect_tables {
            self.track_table(&token);
        }

        if !self.config.keep_sql_alias
            && token.is_keyword()
            && token.text.eq_ignore_ascii_case("AS")
            && !self.in_cast()
        {
            self.pending_alias = Some(token);
            self.prev_significant = Some(token);
            return;
        }

        if self.config.collect_commands && token.is_keyword() && keywords::is_command(token.text) {
            self.metadata.add_command(token.text);
        }

        self.track_parens(&token);
        self.emit(&token);
        self.prev_significant = Some(token);
    }

    fn emit(&mut self, token: &Token<'_>) {
        if token.is_keyword() {
            self.writer.push(token.kind, &token.text.to_ascii_uppercase());
        } else {
            self.writer.push(token.kind, token.text);
        }
    }

    fn in_cast(&self) -> bool {
        self.parens.last() == Some(&true)
    }

    fn track_parens(&mut self, token: &Token<'_>) {
        if token.is_punct("(") {
            let opens_cast = self
                .prev_significant
                .is_some_and(|prev| prev.kind == TokenKind::Ident && keywords::is_cast_function(prev.text));
            self.parens.push(opens_cast);
        } else if token.is_punct(")") {
            self.parens.pop();
        }
    }

    fn track_table(&mut self, token: &Token<'_>) {
        let is_name = matches!(token.kind, TokenKind::Ident | TokenKind::QuotedIdent);

        match std::mem::replace(&mut self.tables, TableState::Idle) {
            TableState::Collecting { mut name, after_dot } => {
                if token.is_punct(".") && !after_dot {
                    name.push('.');
                    self.tables = TableState::Collecting { name, after_dot: true };
                    return;
                }
                if after_dot && is_name {
                    name.push_str(token.text);
                    self.tables = TableState::Collecting { name, after_dot: false };
                    return;
                }
                self.metadata.add_table(&name);
            }
            TableState::Expecting if is_name => {
                if token.is_keyword() && keywords::is_table_name_prefix(token.text) {
                    self.tables = TableState::Expecting;
                    return;
                }
                if !token.is_keyword() {
                    self.tables = TableState::Collecting {
                        name: token.text.to_string(),
                        after_dot: false,
                    };
                    return;
                }
            }
            // Anything else after an indicator, e.g. `FROM (VALUES ...)`:
            // nothing to record for this occurrence.
            TableState::Expecting | TableState::Idle => {}
        }

        if token.is_keyword() && keywords::is_table_indicator(token.text) && !self.is_update_clause(token) {
            self.tables = TableState::Expecting;
        }
    }

    /// `FOR UPDATE`, `ON UPDATE` and `KEY UPDATE` are clauses, not table
    /// references.
    fn is_update_clause(&self, token: &Token<'_>) -> bool {
        token.text.eq_ignore_ascii_case("UPDATE")
            && self.prev_significant.is_some_and(|prev| {
                prev.is_keyword()
                    && (prev.text.eq_ignore_ascii_case("FOR")
                        || prev.text.eq_ignore_ascii_case("ON")
                        || prev.text.eq_ignore_ascii_case("KEY"))
            })
    }

    fn finish(mut self) -> (String, StatementMetadata) {
        if let Some(as_keyword) = self.pending_alias.take() {
            self.emit(&as_keyword);
        }
        if let TableState::Collecting { name, .. } =
            std::mem::replace(&mut self.tables, TableState::Idle)
        {
            self.metadata.add_table(&name);
        }
        (self.writer.finish(), self.metadata)
    }
}

/// Whether `token` can be the name in `AS name`.
fn is_alias_name(token: &Token<'_>) -> bool {
    match token.kind {
        TokenKind::QuotedIdent => true,
        TokenKind::Ident => !token.is_keyword(),
        _ => false,
    }
}
