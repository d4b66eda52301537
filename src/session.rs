//! The connection provider: one open session per backend.

use crate::config::ConnectionConfig;
use crate::error::SchoolDbError;
use crate::translation::PlaceholderStyle;
use crate::types::DatabaseType;

#[cfg(feature = "postgres")]
use crate::postgres::PostgresSession;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteSession;

/// A single open connection.
///
/// Dropping a session releases it; [`Session::close`] does the same but also
/// reports errors raised while shutting down.
#[derive(Debug)]
pub enum Session {
    #[cfg(feature = "postgres")]
    Postgres {
        client: PostgresSession,
        translate_placeholders: bool,
    },
    #[cfg(feature = "sqlite")]
    Sqlite {
        conn: SqliteSession,
        translate_placeholders: bool,
    },
}

impl Session {
    /// Open a session described by `cfg`.
    ///
    /// For `SQLite` the database file is `cfg.database()`, falling back to
    /// `cfg.host()`.
    ///
    /// # Errors
    /// Returns `SchoolDbError::ConfigError` for incomplete settings and
    /// `SchoolDbError::ConnectionError` when the backend cannot be reached.
    pub async fn open(cfg: &ConnectionConfig) -> Result<Self, SchoolDbError> {
        let translate_placeholders = cfg.translate_placeholders();
        let session = match cfg.db_type() {
            #[cfg(feature = "postgres")]
            DatabaseType::Postgres => Session::Postgres {
                client: PostgresSession::open(cfg).await?,
                translate_placeholders,
            },
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => {
                let path = cfg.database().unwrap_or(cfg.host());
                Session::Sqlite {
                    conn: SqliteSession::open(path).await?,
                    translate_placeholders,
                }
            }
        };
        tracing::info!(
            backend = ?cfg.db_type(),
            host = cfg.host(),
            database = cfg.database().unwrap_or("<server>"),
            "database connection successful"
        );
        Ok(session)
    }

    #[must_use]
    pub fn db_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "postgres")]
            Session::Postgres { .. } => DatabaseType::Postgres,
            #[cfg(feature = "sqlite")]
            Session::Sqlite { .. } => DatabaseType::Sqlite,
        }
    }

    #[must_use]
    pub fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::from(self.db_type())
    }

    #[must_use]
    pub fn translates_placeholders(&self) -> bool {
        match self {
            #[cfg(feature = "postgres")]
            Session::Postgres {
                translate_placeholders,
                ..
            } => *translate_placeholders,
            #[cfg(feature = "sqlite")]
            Session::Sqlite {
                translate_placeholders,
                ..
            } => *translate_placeholders,
        }
    }

    /// Release the session.
    ///
    /// # Errors
    /// Returns `SchoolDbError::ConnectionError` if the backend reports a failure while closing.
    pub async fn close(self) -> Result<(), SchoolDbError> {
        let result = match self {
            #[cfg(feature = "postgres")]
            Session::Postgres { client, .. } => client.close().await,
            #[cfg(feature = "sqlite")]
            Session::Sqlite { conn, .. } => conn.close().await,
        };
        tracing::debug!(ok = result.is_ok(), "database connection closed");
        result
    }
}

/// Open a session, logging and swallowing any failure.
///
/// Callers must check for `None` before use.
pub async fn connect_or_log(cfg: &ConnectionConfig) -> Option<Session> {
    match Session::open(cfg).await {
        Ok(session) => Some(session),
        Err(err) => {
            tracing::error!(kind = ?err.kind(), error = %err, "database connection failed");
            None
        }
    }
}
