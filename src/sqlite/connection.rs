use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::SchoolDbError;

pub(crate) type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// One open `SQLite` database handle.
///
/// rusqlite is blocking, so every call hops onto tokio's blocking pool while
/// holding the connection mutex.
pub struct SqliteSession {
    conn: SharedSqliteConnection,
    path: String,
}

impl SqliteSession {
    /// Open (creating if needed) the database at `path` and turn on foreign
    /// key enforcement, which `SQLite` leaves off by default.
    ///
    /// # Errors
    /// Returns `SchoolDbError::ConnectionError` if the file cannot be opened.
    pub async fn open(path: &str) -> Result<Self, SchoolDbError> {
        let path_owned = path.to_owned();
        let conn = tokio::task::spawn_blocking(move || {
            let conn = rusqlite::Connection::open(&path_owned)?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok::<_, rusqlite::Error>(conn)
        })
        .await
        .map_err(|e| SchoolDbError::connection(format!("sqlite open join error: {e}")))?
        .map_err(|e| SchoolDbError::connection(format!("cannot open sqlite database '{path}': {e}")))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: path.to_owned(),
        })
    }

    /// Run `func` against the raw connection on the blocking pool.
    ///
    /// # Errors
    /// Propagates the closure's error, or an `ExecutionError` if the blocking task panicked.
    pub async fn with_connection<F, R>(&self, func: F) -> Result<R, SchoolDbError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, SchoolDbError> + Send + 'static,
        R: Send + 'static,
    {
        run_blocking(Arc::clone(&self.conn), func).await
    }

    /// Close the database handle, surfacing any error `SQLite` reports.
    ///
    /// # Errors
    /// Returns `SchoolDbError::ConnectionError` if the handle is still shared or close fails.
    pub async fn close(self) -> Result<(), SchoolDbError> {
        let mutex = Arc::try_unwrap(self.conn).map_err(|_| {
            SchoolDbError::connection("sqlite connection still in use; cannot close")
        })?;
        let conn = mutex.into_inner();
        tokio::task::spawn_blocking(move || conn.close().map_err(|(_, e)| e))
            .await
            .map_err(|e| SchoolDbError::connection(format!("sqlite close join error: {e}")))?
            .map_err(SchoolDbError::from)
    }
}

impl fmt::Debug for SqliteSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteSession")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, SchoolDbError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, SchoolDbError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| SchoolDbError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}
