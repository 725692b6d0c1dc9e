//! Static keyword classification tables.
//!
//! Lookups are case-insensitive and allocation-free: candidate words are
//! uppercased into a small stack buffer before being matched.

/// Longest keyword in any table, in bytes.
const MAX_KEYWORD_LEN: usize = 16;

fn with_uppercase(word: &str, f: impl FnOnce(&str) -> bool) -> bool {
    let bytes = word.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_KEYWORD_LEN || !word.is_ascii() {
        return false;
    }
    let mut buf = [0u8; MAX_KEYWORD_LEN];
    for (dst, src) in buf.iter_mut().zip(bytes) {
        *dst = src.to_ascii_uppercase();
    }
    match std::str::from_utf8(&buf[..bytes.len()]) {
        Ok(upper) => f(upper),
        Err(_) => false,
    }
}

/// Whether `word` is a recognized SQL keyword. Keywords are rendered in
/// uppercase by the normalizer.
pub fn is_keyword(word: &str) -> bool {
    with_uppercase(word, |upper| {
        matches!(
            upper,
            "ADD"
                | "ALL"
                | "ALTER"
                | "AND"
                | "ANY"
                | "ARRAY"
                | "AS"
                | "ASC"
                | "BEGIN"
                | "BETWEEN"
                | "BY"
                | "CASCADE"
                | "CASE"
                | "CAST"
                | "COLUMN"
                | "COMMIT"
                | "CONSTRAINT"
                | "CORRESPONDING"
                | "CREATE"
                | "CROSS"
                | "CURRENT"
                | "DATABASE"
                | "DEFAULT"
                | "DELETE"
                | "DESC"
                | "DISTINCT"
                | "DO"
                | "DROP"
                | "ELSE"
                | "END"
                | "ESCAPE"
                | "EXCEPT"
                | "EXECUTE"
                | "EXISTS"
                | "EXPLAIN"
                | "FALSE"
                | "FETCH"
                | "FOR"
                | "FOREIGN"
                | "FROM"
                | "FULL"
                | "FUNCTION"
                | "GRANT"
                | "GROUP"
                | "HAVING"
                | "IF"
                | "ILIKE"
                | "IN"
                | "INDEX"
                | "INNER"
                | "INSERT"
                | "INTERSECT"
                | "INTO"
                | "IS"
                | "JOIN"
                | "KEY"
                | "LATERAL"
                | "LEFT"
                | "LIKE"
                | "LIMIT"
                | "MERGE"
                | "NATURAL"
                | "NOT"
                | "NULL"
                | "OFFSET"
                | "ON"
                | "ONLY"
                | "OR"
                | "ORDER"
                | "OUTER"
                | "OVER"
                | "PARTITION"
                | "PRIMARY"
                | "PROCEDURE"
                | "REFERENCES"
                | "RESTRICT"
                | "RETURNING"
                | "REVOKE"
                | "RIGHT"
                | "ROLLBACK"
                | "SAVEPOINT"
                | "SCHEMA"
                | "SELECT"
                | "SET"
                | "SOME"
                | "TABLE"
                | "THEN"
                | "TO"
                | "TRANSACTION"
                | "TRUE"
                | "TRUNCATE"
                | "UNION"
                | "UNIQUE"
                | "UPDATE"
                | "USAGE"
                | "USING"
                | "VALUES"
                | "VIEW"
                | "WHEN"
                | "WHERE"
                | "WINDOW"
                | "WITH"
        )
    })
}

/// Whether `word` is a command keyword recorded in
/// [`StatementMetadata::commands`](crate::StatementMetadata).
pub fn is_command(word: &str) -> bool {
    with_uppercase(word, |upper| {
        matches!(
            upper,
            "SELECT"
                | "INSERT"
                | "UPDATE"
                | "DELETE"
                | "CREATE"
                | "ALTER"
                | "DROP"
                | "GRANT"
                | "REVOKE"
                | "BEGIN"
                | "COMMIT"
                | "JOIN"
                | "TRUNCATE"
                | "MERGE"
                | "EXPLAIN"
                | "EXECUTE"
        )
    })
}

/// Whether `word` introduces a table reference as its next qualified name.
pub fn is_table_indicator(word: &str) -> bool {
    with_uppercase(word, |upper| {
        matches!(upper, "FROM" | "JOIN" | "INTO" | "UPDATE" | "TABLE")
    })
}

/// Keywords that may sit between a table indicator and the table name,
/// as in `CREATE TABLE IF NOT EXISTS t` or `FROM ONLY t`.
pub fn is_table_name_prefix(word: &str) -> bool {
    with_uppercase(word, |upper| {
        matches!(upper, "IF" | "NOT" | "EXISTS" | "ONLY")
    })
}

/// Functions whose parenthesized argument uses `AS` for a target type
/// rather than an alias.
pub fn is_cast_function(word: &str) -> bool {
    with_uppercase(word, |upper| {
        matches!(upper, "CAST" | "TRY_CAST" | "SAFE_CAST")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_case_insensitive() {
        assert!(is_keyword("select"));
        assert!(is_keyword("Select"));
        assert!(is_keyword("SELECT"));
        assert!(is_keyword("corresponding"));
    }

    #[test]
    fn common_column_names_are_not_keywords() {
        for word in ["name", "id", "state", "interval", "timestamp", "description", "updated"] {
            assert!(!is_keyword(word), "{word} must keep its casing");
        }
    }

    #[test]
    fn every_command_is_a_keyword() {
        for word in [
            "SELECT", "INSERT", "UPDATE", "DELETE", "CREATE", "ALTER", "DROP", "GRANT", "REVOKE",
            "BEGIN", "COMMIT", "JOIN", "TRUNCATE", "MERGE", "EXPLAIN", "EXECUTE",
        ] {
            assert!(is_command(word));
            assert!(is_keyword(word));
        }
        assert!(!is_command("TABLE"));
        assert!(!is_command("WITH"));
    }

    #[test]
    fn table_indicators() {
        assert!(is_table_indicator("from"));
        assert!(is_table_indicator("Join"));
        assert!(is_table_indicator("TABLE"));
        assert!(!is_table_indicator("WHERE"));
    }

    #[test]
    fn oversized_and_non_ascii_words_are_rejected() {
        assert!(!is_keyword("a_very_long_identifier_name"));
        assert!(!is_keyword("sélect"));
        assert!(!is_keyword(""));
    }
}
