use crate::config::{ConnectionConfig, DEFAULT_POSTGRES_PORT};
use crate::error::SchoolDbError;

/// Database a server-level session connects to when none is configured.
pub const MAINTENANCE_DATABASE: &str = "postgres";

/// Translate a [`ConnectionConfig`] into driver settings.
///
/// # Errors
/// Returns `SchoolDbError::ConfigError` if host, user, or password is missing.
pub fn pg_config_from(cfg: &ConnectionConfig) -> Result<tokio_postgres::Config, SchoolDbError> {
    if cfg.host().trim().is_empty() {
        return Err(SchoolDbError::ConfigError("host is required".to_string()));
    }
    let user = cfg
        .user()
        .ok_or_else(|| SchoolDbError::ConfigError("user is required".to_string()))?;
    let password = cfg
        .password()
        .ok_or_else(|| SchoolDbError::ConfigError("password is required".to_string()))?;

    let mut pg = tokio_postgres::Config::new();
    pg.host(cfg.host())
        .port(cfg.port().unwrap_or(DEFAULT_POSTGRES_PORT))
        .user(user)
        .password(password)
        .dbname(cfg.database().unwrap_or(MAINTENANCE_DATABASE))
        .application_name("school-db");
    Ok(pg)
}
