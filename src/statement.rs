//! Classifying SQL text by what it does to the database.

use std::sync::LazyLock;

use regex::Regex;

static LEADING_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)(?:\s+([A-Za-z]+))?").expect("static regex")
});

/// How a statement has to be run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Read-only: `SELECT`, `WITH`, `SHOW`, `EXPLAIN`, `PRAGMA`, `VALUES`.
    Query,
    /// Row changes: `INSERT`, `UPDATE`, `DELETE`, `REPLACE`, `MERGE`.
    Dml,
    /// Schema changes that may run in a transaction: `CREATE`, `ALTER`, `DROP`, ...
    Ddl,
    /// Statements the server refuses inside a transaction block.
    DatabaseLevel,
    /// Explicit transaction control: `BEGIN`, `COMMIT`, `ROLLBACK`, `SAVEPOINT`, ...
    Transaction,
    /// Anything else; run as-is.
    Other,
}

impl StatementKind {
    /// Classify `sql` by its leading keywords, ignoring leading whitespace and comments.
    #[must_use]
    pub fn classify(sql: &str) -> Self {
        let body = strip_leading_comments(sql);
        let Some(caps) = LEADING_KEYWORDS.captures(body) else {
            return StatementKind::Other;
        };
        let first = caps[1].to_ascii_uppercase();
        let second = caps
            .get(2)
            .map(|m| m.as_str().to_ascii_uppercase())
            .unwrap_or_default();

        match first.as_str() {
            "SELECT" | "WITH" | "SHOW" | "EXPLAIN" | "PRAGMA" | "VALUES" | "TABLE" => {
                StatementKind::Query
            }
            "INSERT" | "UPDATE" | "DELETE" | "REPLACE" | "MERGE" => StatementKind::Dml,
            "CREATE" | "DROP" if second == "DATABASE" => StatementKind::DatabaseLevel,
            "VACUUM" => StatementKind::DatabaseLevel,
            "BEGIN" | "START" | "COMMIT" | "END" | "ROLLBACK" | "ABORT" | "SAVEPOINT"
            | "RELEASE" => StatementKind::Transaction,
            "CREATE" | "ALTER" | "DROP" | "TRUNCATE" | "COMMENT" | "GRANT" | "REVOKE" => {
                StatementKind::Ddl
            }
            _ => StatementKind::Other,
        }
    }

    /// Whether running the statement changes persisted state.
    #[must_use]
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            StatementKind::Dml | StatementKind::Ddl | StatementKind::DatabaseLevel
        )
    }
}

fn strip_leading_comments(sql: &str) -> &str {
    let mut rest = sql.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map_or("", |(_, tail)| tail).trim_start();
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/").map_or("", |(_, tail)| tail).trim_start();
        } else {
            return rest;
        }
    }
}

/// Trim surrounding whitespace and a trailing `;` so drivers that reject
/// trailing text after a single statement accept hand-written SQL.
#[must_use]
pub fn normalize(sql: &str) -> &str {
    let trimmed = sql.trim();
    trimmed.strip_suffix(';').map_or(trimmed, str::trim_end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_crud_and_schema_statements() {
        assert_eq!(StatementKind::classify("SELECT * FROM teacher;"), StatementKind::Query);
        assert_eq!(
            StatementKind::classify("\n  update client set address = 'x'"),
            StatementKind::Dml
        );
        assert_eq!(
            StatementKind::classify("CREATE TABLE client (client_id INT PRIMARY KEY)"),
            StatementKind::Ddl
        );
        assert_eq!(
            StatementKind::classify("ALTER TABLE course ADD FOREIGN KEY(teacher) REFERENCES teacher(teacher_id)"),
            StatementKind::Ddl
        );
        assert_eq!(
            StatementKind::classify("CREATE DATABASE school"),
            StatementKind::DatabaseLevel
        );
        assert_eq!(
            StatementKind::classify("drop   database school"),
            StatementKind::DatabaseLevel
        );
        assert_eq!(StatementKind::classify("BEGIN"), StatementKind::Transaction);
        assert_eq!(
            StatementKind::classify("start transaction"),
            StatementKind::Transaction
        );
        assert_eq!(StatementKind::classify("SET search_path TO public"), StatementKind::Other);
        assert_eq!(StatementKind::classify("   "), StatementKind::Other);
    }

    #[test]
    fn skips_leading_comments() {
        let sql = "-- remove the russian course\n/* temporarily */ DELETE FROM course WHERE course_id = 20";
        assert_eq!(StatementKind::classify(sql), StatementKind::Dml);
        assert!(StatementKind::classify(sql).is_mutating());
        assert!(!StatementKind::Query.is_mutating());
    }

    #[test]
    fn normalize_strips_one_trailing_semicolon() {
        assert_eq!(normalize("\n SELECT 1; \n"), "SELECT 1");
        assert_eq!(normalize("SELECT 1"), "SELECT 1");
        assert_eq!(normalize("SELECT 1 ;"), "SELECT 1");
    }
}
