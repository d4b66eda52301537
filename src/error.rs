use thiserror::Error;

#[cfg(feature = "sqlite")]
use rusqlite;
#[cfg(feature = "postgres")]
use tokio_postgres;

/// Coarse failure taxonomy every [`SchoolDbError`] maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The configuration was incomplete or malformed; nothing was attempted.
    Config,
    /// The server could not be reached or refused the credentials.
    Connection,
    /// A DDL/DML statement failed (syntax, constraint, missing referenced row).
    Statement,
    /// A read-only query failed before its rows could be fetched.
    Read,
}

#[derive(Debug, Error)]
pub enum SchoolDbError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Query read error: {0}")]
    ReadError(String),

    #[error("Other database error: {0}")]
    Other(String),
}

impl SchoolDbError {
    /// Classify the error. Raw driver errors that escaped without phase context
    /// count as statement failures.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SchoolDbError::ConfigError(_) => ErrorKind::Config,
            SchoolDbError::ConnectionError(_) => ErrorKind::Connection,
            SchoolDbError::ReadError(_) => ErrorKind::Read,
            SchoolDbError::ParameterError(_)
            | SchoolDbError::ExecutionError(_)
            | SchoolDbError::Other(_) => ErrorKind::Statement,
            #[cfg(feature = "postgres")]
            SchoolDbError::PostgresError(err) => {
                if err.is_closed() {
                    ErrorKind::Connection
                } else {
                    ErrorKind::Statement
                }
            }
            #[cfg(feature = "sqlite")]
            SchoolDbError::SqliteError(rusqlite::Error::SqliteFailure(code, _))
                if code.code == rusqlite::ErrorCode::CannotOpen =>
            {
                ErrorKind::Connection
            }
            #[cfg(feature = "sqlite")]
            SchoolDbError::SqliteError(_) => ErrorKind::Statement,
        }
    }

    /// Whether the server rejected the statement for violating a UNIQUE,
    /// PRIMARY KEY, or FOREIGN KEY constraint.
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            #[cfg(feature = "postgres")]
            SchoolDbError::PostgresError(err) => err.code().is_some_and(|state| {
                *state == tokio_postgres::error::SqlState::UNIQUE_VIOLATION
                    || *state == tokio_postgres::error::SqlState::FOREIGN_KEY_VIOLATION
            }),
            #[cfg(feature = "sqlite")]
            SchoolDbError::SqliteError(rusqlite::Error::SqliteFailure(code, _)) => {
                code.code == rusqlite::ErrorCode::ConstraintViolation
            }
            SchoolDbError::ExecutionError(msg) => msg.contains("constraint violation"),
            _ => false,
        }
    }

    /// Wrap a driver error that happened while connecting.
    pub(crate) fn connection(err: impl std::fmt::Display) -> Self {
        SchoolDbError::ConnectionError(err.to_string())
    }

    /// Wrap a driver error that happened while running a mutating statement.
    ///
    /// Constraint violations keep the phrase "constraint violation" so
    /// [`is_constraint_violation`](Self::is_constraint_violation) still holds
    /// after the driver error has been flattened into a message.
    pub(crate) fn statement(err: SchoolDbError) -> Self {
        match err {
            SchoolDbError::ConfigError(_)
            | SchoolDbError::ConnectionError(_)
            | SchoolDbError::ParameterError(_)
            | SchoolDbError::ExecutionError(_) => err,
            other if other.kind() == ErrorKind::Connection => {
                SchoolDbError::ConnectionError(other.to_string())
            }
            other => {
                if other.is_constraint_violation() {
                    SchoolDbError::ExecutionError(format!("constraint violation: {other}"))
                } else {
                    SchoolDbError::ExecutionError(other.to_string())
                }
            }
        }
    }

    /// Wrap a driver error that happened while reading rows.
    pub(crate) fn read(err: SchoolDbError) -> Self {
        match err {
            SchoolDbError::ConfigError(_)
            | SchoolDbError::ConnectionError(_)
            | SchoolDbError::ParameterError(_)
            | SchoolDbError::ReadError(_) => err,
            other if other.kind() == ErrorKind::Connection => {
                SchoolDbError::ConnectionError(other.to_string())
            }
            other => SchoolDbError::ReadError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_variants_map_to_kinds() {
        assert_eq!(
            SchoolDbError::ConfigError("x".into()).kind(),
            ErrorKind::Config
        );
        assert_eq!(
            SchoolDbError::ConnectionError("x".into()).kind(),
            ErrorKind::Connection
        );
        assert_eq!(
            SchoolDbError::ExecutionError("x".into()).kind(),
            ErrorKind::Statement
        );
        assert_eq!(SchoolDbError::ReadError("x".into()).kind(), ErrorKind::Read);
        assert_eq!(
            SchoolDbError::ParameterError("x".into()).kind(),
            ErrorKind::Statement
        );
    }

    #[test]
    fn phase_wrappers_keep_config_and_connection_errors() {
        let err = SchoolDbError::statement(SchoolDbError::ConnectionError("down".into()));
        assert_eq!(err.kind(), ErrorKind::Connection);

        let err = SchoolDbError::read(SchoolDbError::Other("boom".into()));
        assert_eq!(err.kind(), ErrorKind::Read);
        assert_eq!(err.to_string(), "Query read error: Other database error: boom");
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn lost_connections_stay_connection_errors_in_every_phase() {
        let cannot_open = || {
            SchoolDbError::from(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                None,
            ))
        };
        assert_eq!(cannot_open().kind(), ErrorKind::Connection);

        let err = SchoolDbError::statement(cannot_open());
        assert!(matches!(err, SchoolDbError::ConnectionError(_)));
        let err = SchoolDbError::read(cannot_open());
        assert!(matches!(err, SchoolDbError::ConnectionError(_)));
        assert_eq!(err.kind(), ErrorKind::Connection);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_constraint_survives_statement_wrapping() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY);")
            .unwrap();
        conn.execute("INSERT INTO t VALUES (1)", []).unwrap();
        let raw = conn.execute("INSERT INTO t VALUES (1)", []).unwrap_err();

        let err = SchoolDbError::from(raw);
        assert!(err.is_constraint_violation());

        let wrapped = SchoolDbError::statement(err);
        assert_eq!(wrapped.kind(), ErrorKind::Statement);
        assert!(wrapped.is_constraint_violation());
    }
}
