use std::fmt;

use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};

use super::config::pg_config_from;
use crate::config::ConnectionConfig;
use crate::error::SchoolDbError;

/// One open Postgres session.
///
/// The driver splits a session into a `Client` and a connection future that
/// does the socket I/O; the future runs on its own task until the client is
/// dropped.
pub struct PostgresSession {
    pub(crate) client: Client,
    driver: JoinHandle<()>,
}

impl PostgresSession {
    /// Connect using `cfg`.
    ///
    /// # Errors
    /// Returns `SchoolDbError::ConfigError` for incomplete settings and
    /// `SchoolDbError::ConnectionError` if the server cannot be reached or
    /// rejects the credentials.
    pub async fn open(cfg: &ConnectionConfig) -> Result<Self, SchoolDbError> {
        let pg = pg_config_from(cfg)?;
        let (client, connection) = pg.connect(NoTls).await.map_err(|e| {
            SchoolDbError::connection(format!(
                "cannot connect to postgres at {}: {e}",
                cfg.host()
            ))
        })?;

        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::warn!(error = %e, "postgres connection closed with error");
            }
        });

        Ok(Self { client, driver })
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Drop the client and wait for the connection task to wind down.
    ///
    /// # Errors
    /// Returns `SchoolDbError::ConnectionError` if the connection task panicked.
    pub async fn close(self) -> Result<(), SchoolDbError> {
        let Self { client, driver } = self;
        drop(client);
        driver
            .await
            .map_err(|e| SchoolDbError::connection(format!("postgres connection task failed: {e}")))
    }
}

impl fmt::Debug for PostgresSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresSession")
            .field("closed", &self.client.is_closed())
            .finish_non_exhaustive()
    }
}
