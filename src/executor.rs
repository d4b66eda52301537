//! Statement executor, batch executor, and query reader.
//!
//! Each function runs against an already-open [`Session`] and returns a typed
//! result; failures are also logged so scripted callers that only look at the
//! log see them.

use crate::adapters::params::check_uniform_arity;
use crate::error::SchoolDbError;
use crate::results::ResultSet;
use crate::session::Session;
use crate::statement::{StatementKind, normalize};
use crate::translation::translate_if;
use crate::types::{DatabaseType, RowValues};

#[cfg(feature = "postgres")]
use crate::postgres::executor as pg;
#[cfg(feature = "sqlite")]
use crate::sqlite::executor as lite;

fn log_failure<T>(op: &'static str, result: Result<T, SchoolDbError>) -> Result<T, SchoolDbError> {
    if let Err(err) = &result {
        tracing::warn!(op, kind = ?err.kind(), error = %err, "query failed");
    }
    result
}

/// Execute one SQL statement and commit it if it mutates state.
///
/// Returns the number of rows affected (0 for DDL and reads). Every call
/// commits on its own, so explicit transaction control is refused.
///
/// # Errors
/// Returns a `Config`-kind error for `BEGIN`/`COMMIT`/`ROLLBACK` and friends,
/// or a `Statement`-kind error if the statement fails; nothing is committed.
pub async fn execute_query(session: &mut Session, sql: &str) -> Result<usize, SchoolDbError> {
    let sql = normalize(sql);
    let kind = StatementKind::classify(sql);
    tracing::debug!(?kind, sql, "execute_query");
    if kind == StatementKind::Transaction {
        return log_failure(
            "execute_query",
            Err(SchoolDbError::ConfigError(format!(
                "transaction control is managed per call; refusing '{sql}'"
            ))),
        );
    }

    let result = match session {
        #[cfg(feature = "postgres")]
        Session::Postgres { client, .. } => pg::execute_statement(client, sql, kind).await,
        #[cfg(feature = "sqlite")]
        Session::Sqlite { conn, .. } => lite::execute_statement(conn, sql, kind).await,
    };
    let result = result.map_err(SchoolDbError::statement);
    if let Ok(affected) = &result {
        tracing::debug!(affected, "query successful");
    }
    log_failure("execute_query", result)
}

/// Execute one parameterized statement (typically single-row DML) and commit it.
///
/// # Errors
/// Returns a `Statement`-kind error if binding or execution fails.
pub async fn execute_dml(
    session: &mut Session,
    sql: &str,
    params: &[RowValues],
) -> Result<usize, SchoolDbError> {
    let style = session.placeholder_style();
    let translated = translate_if(normalize(sql), style, session.translates_placeholders());
    tracing::debug!(sql = %translated, params = params.len(), "execute_dml");

    let result = match session {
        #[cfg(feature = "postgres")]
        Session::Postgres { client, .. } => pg::execute_dml(client, &translated, params).await,
        #[cfg(feature = "sqlite")]
        Session::Sqlite { conn, .. } => lite::execute_dml(conn, &translated, params).await,
    };
    log_failure("execute_dml", result.map_err(SchoolDbError::statement))
}

/// Bind each row of `rows` to `template` and execute them all in one
/// transaction with a single commit.
///
/// The batch is all-or-nothing: if any row fails, no row is committed.
/// An empty batch is a no-op.
///
/// # Errors
/// Returns `SchoolDbError::ParameterError` when rows bind different numbers of
/// values, or a `Statement`-kind error for the first failing row.
pub async fn execute_list_query(
    session: &mut Session,
    template: &str,
    rows: &[Vec<RowValues>],
) -> Result<usize, SchoolDbError> {
    check_uniform_arity(rows)?;
    if rows.is_empty() {
        return Ok(0);
    }

    let style = session.placeholder_style();
    let translated = translate_if(normalize(template), style, session.translates_placeholders());
    tracing::debug!(sql = %translated, rows = rows.len(), "execute_list_query");

    let result = match session {
        #[cfg(feature = "postgres")]
        Session::Postgres { client, .. } => pg::execute_many(client, &translated, rows).await,
        #[cfg(feature = "sqlite")]
        Session::Sqlite { conn, .. } => lite::execute_many(conn, &translated, rows).await,
    };
    let result = result.map_err(SchoolDbError::statement);
    if let Ok(affected) = &result {
        tracing::debug!(affected, "batch committed");
    }
    log_failure("execute_list_query", result)
}

/// Run a read-only statement and return every row.
///
/// # Errors
/// Returns a `Read`-kind error if the query fails.
pub async fn read_query(session: &Session, sql: &str) -> Result<ResultSet, SchoolDbError> {
    read_query_with_params(session, sql, &[]).await
}

/// Run a parameterized read-only statement and return every row.
///
/// # Errors
/// Returns a `Read`-kind error if binding or the query fails.
pub async fn read_query_with_params(
    session: &Session,
    sql: &str,
    params: &[RowValues],
) -> Result<ResultSet, SchoolDbError> {
    let sql = normalize(sql);
    let translated = if params.is_empty() {
        std::borrow::Cow::Borrowed(sql)
    } else {
        translate_if(sql, session.placeholder_style(), session.translates_placeholders())
    };
    tracing::debug!(sql = %translated, params = params.len(), "read_query");

    let result = match session {
        #[cfg(feature = "postgres")]
        Session::Postgres { client, .. } => pg::execute_select(client, &translated, params).await,
        #[cfg(feature = "sqlite")]
        Session::Sqlite { conn, .. } => lite::execute_select(conn, &translated, params).await,
    };
    let result = result.map_err(SchoolDbError::read);
    if let Ok(rs) = &result {
        tracing::debug!(rows = rs.len(), "read successful");
    }
    log_failure("read_query", result)
}

/// Create a database on the server the session is connected to.
///
/// `SQLite` databases are files that come into existence when first opened,
/// so this is a no-op there.
///
/// # Errors
/// Returns `SchoolDbError::ConfigError` for a name that is not a plain
/// identifier, or a `Statement`-kind error if the server refuses.
pub async fn create_database(session: &mut Session, name: &str) -> Result<(), SchoolDbError> {
    if !is_plain_identifier(name) {
        return Err(SchoolDbError::ConfigError(format!(
            "database name '{name}' must be letters, digits, and underscores"
        )));
    }
    match session.db_type() {
        #[cfg(feature = "postgres")]
        DatabaseType::Postgres => {
            execute_query(session, &format!("CREATE DATABASE \"{name}\"")).await?;
            tracing::info!(database = name, "database created successfully");
        }
        #[cfg(feature = "sqlite")]
        DatabaseType::Sqlite => {
            tracing::info!(database = name, "sqlite database is created on open; nothing to do");
        }
    }
    Ok(())
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
