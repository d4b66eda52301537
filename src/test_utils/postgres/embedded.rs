use super::super::SHARED_RUNTIME;
use crate::config::ConnectionConfig;
use crate::executor::read_query;
use crate::session::Session;
use crate::types::DatabaseType;

use postgresql_embedded::PostgreSQL;

/// A running embedded `PostgreSQL` server.
pub struct EmbeddedPostgres {
    pub postgresql: PostgreSQL,
    pub port: u16,
    /// Server-level settings with the embedded superuser's credentials.
    pub config: ConnectionConfig,
}

/// Start an embedded `PostgreSQL` server for tests.
///
/// The returned config is not scoped to a database, so callers can create
/// the databases they need.
///
/// # Errors
/// Returns an error if the embedded server cannot be set up or started, or if
/// the post-start connectivity check fails.
pub fn setup_postgres_embedded() -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    SHARED_RUNTIME.block_on(async {
        let mut postgresql = PostgreSQL::default();

        // Bundled binaries, so no download
        postgresql.setup().await?;
        postgresql.start().await?;

        let settings = postgresql.settings();
        let port = settings.port;
        let config = ConnectionConfig::builder(DatabaseType::Postgres, settings.host.clone())
            .port(port)
            .user(settings.username.clone())
            .password(settings.password.clone())
            .finish();

        println!("PostgreSQL started on port {port}");

        // Quick connection test
        let session = Session::open(&config).await?;
        read_query(&session, "SELECT 1").await?;
        session.close().await?;

        Ok(EmbeddedPostgres {
            postgresql,
            port,
            config,
        })
    })
}

/// Stop a previously started embedded `PostgreSQL` server.
pub fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    let EmbeddedPostgres { postgresql, .. } = postgres;
    SHARED_RUNTIME.block_on(async move {
        let _ = postgresql.stop().await;
    });
}
