//! Metadata extracted while normalizing a statement.

use serde::{Deserialize, Serialize};

/// Tables, comments and commands found in a statement.
///
/// Each collection is only populated when the matching
/// [`NormalizerConfig`](super::NormalizerConfig) flag is set; otherwise it
/// stays empty. `tables` and `commands` are ordered sets: duplicates are
/// dropped and the first occurrence decides the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementMetadata {
    /// Qualified table names exactly as written, quotes and dots included.
    pub tables: Vec<String>,
    /// Comments verbatim, in source order.
    pub comments: Vec<String>,
    /// Command keywords, uppercased.
    pub commands: Vec<String>,
}

impl StatementMetadata {
    /// Total byte length of every collected string.
    pub fn size(&self) -> usize {
        self.tables
            .iter()
            .chain(&self.comments)
            .chain(&self.commands)
            .map(String::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.comments.is_empty() && self.commands.is_empty()
    }

    pub(crate) fn add_table(&mut self, name: &str) {
        if !name.is_empty() && !self.tables.iter().any(|t| t == name) {
            self.tables.push(name.to_string());
        }
    }

    pub(crate) fn add_command(&mut self, keyword: &str) {
        let upper = keyword.to_ascii_uppercase();
        if !self.commands.contains(&upper) {
            self.commands.push(upper);
        }
    }

    pub(crate) fn add_comment(&mut self, comment: &str) {
        self.comments.push(comment.to_string());
    }
}
