//! A facade that opens a fresh session for every logical step.

use crate::config::ConnectionConfig;
use crate::error::SchoolDbError;
use crate::executor;
use crate::fixtures;
use crate::model::Entity;
use crate::results::{ResultSet, Table};
use crate::schema;
use crate::session::Session;
use crate::types::{DatabaseType, RowValues};

/// Settings plus the operations that run against them.
///
/// Every method opens a session, runs, and closes the session whether the
/// step succeeded or not. To run several statements on one connection, use
/// [`SchoolDb::with_session`] or a [`Session`] directly.
#[derive(Debug, Clone)]
pub struct SchoolDb {
    config: ConnectionConfig,
}

impl SchoolDb {
    #[must_use]
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// A facade scoped to `database` on the same server.
    ///
    /// A `SQLite` file is its own database, so `SQLite` settings are kept as-is.
    #[must_use]
    #[cfg_attr(not(feature = "postgres"), allow(unused_variables))]
    pub fn for_database(&self, database: &str) -> Self {
        match self.config.db_type() {
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => self.clone(),
            #[cfg(feature = "postgres")]
            DatabaseType::Postgres => Self::new(self.config.with_database(database)),
        }
    }

    /// Open a session, run `f` with it, then close it.
    ///
    /// The session is closed on both the success and the failure path; the
    /// error from `f` wins over an error raised while closing.
    ///
    /// # Errors
    /// Returns the connection error, the error from `f`, or the close error.
    pub async fn with_session<T, F>(&self, f: F) -> Result<T, SchoolDbError>
    where
        F: AsyncFnOnce(&mut Session) -> Result<T, SchoolDbError>,
    {
        let mut session = Session::open(&self.config).await?;
        let result = f(&mut session).await;
        let closed = session.close().await;
        match (result, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(err), _) => Err(err),
        }
    }

    /// Create `name` from a server-level session (the configured database is ignored).
    ///
    /// # Errors
    /// See [`executor::create_database`].
    pub async fn create_database(&self, name: &str) -> Result<(), SchoolDbError> {
        let server = match self.config.db_type() {
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => self.clone(),
            #[cfg(feature = "postgres")]
            DatabaseType::Postgres => Self::new(self.config.without_database()),
        };
        server
            .with_session(async |session| executor::create_database(session, name).await)
            .await
    }

    /// # Errors
    /// See [`executor::execute_query`].
    pub async fn execute_query(&self, sql: &str) -> Result<usize, SchoolDbError> {
        self.with_session(async |session| executor::execute_query(session, sql).await)
            .await
    }

    /// # Errors
    /// See [`executor::execute_dml`].
    pub async fn execute_dml(&self, sql: &str, params: &[RowValues]) -> Result<usize, SchoolDbError> {
        self.with_session(async |session| executor::execute_dml(session, sql, params).await)
            .await
    }

    /// # Errors
    /// See [`executor::execute_list_query`].
    pub async fn execute_list_query(
        &self,
        template: &str,
        rows: &[Vec<RowValues>],
    ) -> Result<usize, SchoolDbError> {
        self.with_session(async |session| {
            executor::execute_list_query(session, template, rows).await
        })
        .await
    }

    /// # Errors
    /// See [`executor::read_query`].
    pub async fn read_query(&self, sql: &str) -> Result<ResultSet, SchoolDbError> {
        self.with_session(async |session| executor::read_query(session, sql).await)
            .await
    }

    /// # Errors
    /// See [`executor::read_query_with_params`].
    pub async fn read_query_with_params(
        &self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SchoolDbError> {
        self.with_session(async |session| {
            executor::read_query_with_params(session, sql, params).await
        })
        .await
    }

    /// Read `sql` and label the columns with `columns`.
    ///
    /// # Errors
    /// A `Read`-kind error from the query, or `ParameterError` if the labels do
    /// not match the row width.
    pub async fn read_table(&self, sql: &str, columns: &[&str]) -> Result<Table, SchoolDbError> {
        self.read_query(sql).await?.into_table(columns.iter().copied())
    }

    /// Every row of `T`'s table, ordered by primary key.
    ///
    /// # Errors
    /// A `Read`-kind error from the query or from decoding a row.
    pub async fn read_all<T: Entity>(&self) -> Result<Vec<T>, SchoolDbError> {
        let rs = self.read_query(&T::select_all()).await?;
        rs.results.iter().map(T::from_row).collect()
    }

    /// # Errors
    /// Stops at the first failing DDL statement.
    pub async fn create_schema(&self) -> Result<(), SchoolDbError> {
        self.with_session(async |session| schema::create_schema(session).await)
            .await
    }

    /// # Errors
    /// Stops at the first failing drop.
    pub async fn drop_schema(&self) -> Result<(), SchoolDbError> {
        self.with_session(async |session| schema::drop_schema(session).await)
            .await
    }

    /// Load the fixture dataset on one session.
    ///
    /// # Errors
    /// See [`fixtures::populate`].
    pub async fn populate(&self) -> Result<usize, SchoolDbError> {
        self.with_session(async |session| fixtures::populate(session).await)
            .await
    }
}
