//! Connection settings.
//!
//! A [`ConnectionConfig`] bundles everything needed to open a session: which
//! backend, where it lives, who to authenticate as, and which database to
//! scope the session to. It is immutable once built; deriving a config for a
//! different database produces a new value.

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::SchoolDbError;
use crate::types::DatabaseType;

/// Default Postgres port used when none is configured.
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Environment variables read by [`ConnectionConfig::from_env`].
pub const ENV_BACKEND: &str = "SCHOOL_DB_BACKEND";
pub const ENV_HOST: &str = "SCHOOL_DB_HOST";
pub const ENV_PORT: &str = "SCHOOL_DB_PORT";
pub const ENV_USER: &str = "SCHOOL_DB_USER";
pub const ENV_PASSWORD: &str = "SCHOOL_DB_PASSWORD";
pub const ENV_DATABASE: &str = "SCHOOL_DB_NAME";

/// Immutable connection settings for one backend.
#[derive(Clone, Serialize)]
pub struct ConnectionConfig {
    db_type: DatabaseType,
    host: String,
    port: Option<u16>,
    user: Option<String>,
    #[serde(skip)]
    password: Option<String>,
    database: Option<String>,
    translate_placeholders: bool,
}

impl ConnectionConfig {
    /// Settings for a Postgres server, not yet scoped to a database.
    #[cfg(feature = "postgres")]
    #[must_use]
    pub fn postgres(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        ConnectionConfigBuilder::new(DatabaseType::Postgres, host)
            .user(user)
            .password(password)
            .finish()
    }

    /// Settings for a `SQLite` database file (or `:memory:`).
    #[cfg(feature = "sqlite")]
    #[must_use]
    pub fn sqlite(path: impl Into<String>) -> Self {
        let path = path.into();
        ConnectionConfigBuilder::new(DatabaseType::Sqlite, path.clone())
            .database(path)
            .finish()
    }

    #[must_use]
    pub fn builder(db_type: DatabaseType, host: impl Into<String>) -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::new(db_type, host)
    }

    /// Read settings from `SCHOOL_DB_*` environment variables.
    ///
    /// `SCHOOL_DB_BACKEND` picks the backend (`postgres` or `sqlite`, default
    /// `postgres` when compiled in); `SCHOOL_DB_HOST` is required.
    ///
    /// # Errors
    /// Returns `SchoolDbError::ConfigError` when a variable is missing or malformed.
    pub fn from_env() -> Result<Self, SchoolDbError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, SchoolDbError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_type = match lookup(ENV_BACKEND) {
            Some(raw) => DatabaseType::from_str(&raw, true).map_err(|_| {
                SchoolDbError::ConfigError(format!("{ENV_BACKEND}: unknown backend '{raw}'"))
            })?,
            None => default_backend()?,
        };
        let host = lookup(ENV_HOST)
            .ok_or_else(|| SchoolDbError::ConfigError(format!("{ENV_HOST} is required")))?;

        let mut builder = ConnectionConfigBuilder::new(db_type, host);
        if let Some(raw) = lookup(ENV_PORT) {
            let port = raw.parse::<u16>().map_err(|e| {
                SchoolDbError::ConfigError(format!("{ENV_PORT}: invalid port '{raw}': {e}"))
            })?;
            builder = builder.port(port);
        }
        if let Some(user) = lookup(ENV_USER) {
            builder = builder.user(user);
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            builder = builder.password(password);
        }
        if let Some(database) = lookup(ENV_DATABASE) {
            builder = builder.database(database);
        }
        Ok(builder.finish())
    }

    /// A copy of these settings scoped to `database`.
    #[must_use]
    pub fn with_database(&self, database: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            ..self.clone()
        }
    }

    /// A copy of these settings with no database scope (server-level session).
    #[must_use]
    pub fn without_database(&self) -> Self {
        Self {
            database: None,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn db_type(&self) -> DatabaseType {
        self.db_type
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    #[must_use]
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    #[must_use]
    pub fn translate_placeholders(&self) -> bool {
        self.translate_placeholders
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("db_type", &self.db_type)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("translate_placeholders", &self.translate_placeholders)
            .finish()
    }
}

/// Fluent builder for [`ConnectionConfig`].
#[derive(Debug, Clone)]
pub struct ConnectionConfigBuilder {
    cfg: ConnectionConfig,
}

impl ConnectionConfigBuilder {
    #[must_use]
    pub fn new(db_type: DatabaseType, host: impl Into<String>) -> Self {
        Self {
            cfg: ConnectionConfig {
                db_type,
                host: host.into(),
                port: None,
                user: None,
                password: None,
                database: None,
                translate_placeholders: true,
            },
        }
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.cfg.port = Some(port);
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.cfg.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.cfg.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.cfg.database = Some(database.into());
        self
    }

    /// Rewrite `%s`, `$N`, and `?N` placeholders to the backend's dialect
    /// before binding parameters. On by default.
    #[must_use]
    pub fn translation(mut self, translate_placeholders: bool) -> Self {
        self.cfg.translate_placeholders = translate_placeholders;
        self
    }

    #[must_use]
    pub fn finish(self) -> ConnectionConfig {
        self.cfg
    }
}

/// The backend used when none is named: Postgres when compiled in, else `SQLite`.
///
/// # Errors
/// Returns `SchoolDbError::ConfigError` when neither backend is compiled in.
#[allow(unreachable_code)]
pub fn default_backend() -> Result<DatabaseType, SchoolDbError> {
    #[cfg(feature = "postgres")]
    return Ok(DatabaseType::Postgres);
    #[cfg(feature = "sqlite")]
    return Ok(DatabaseType::Sqlite);
    Err(SchoolDbError::ConfigError(
        "no database backend compiled in".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn env_lookup_builds_postgres_config() {
        let cfg = ConnectionConfig::from_lookup(lookup_from(&[
            (ENV_BACKEND, "postgres"),
            (ENV_HOST, "localhost"),
            (ENV_PORT, "5433"),
            (ENV_USER, "root"),
            (ENV_PASSWORD, "secret"),
            (ENV_DATABASE, "school"),
        ]))
        .unwrap();

        assert_eq!(cfg.db_type(), DatabaseType::Postgres);
        assert_eq!(cfg.host(), "localhost");
        assert_eq!(cfg.port(), Some(5433));
        assert_eq!(cfg.user(), Some("root"));
        assert_eq!(cfg.password(), Some("secret"));
        assert_eq!(cfg.database(), Some("school"));
        assert!(cfg.translate_placeholders());
    }

    #[test]
    fn env_lookup_requires_host() {
        let err = ConnectionConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains(ENV_HOST));
    }

    #[test]
    fn env_lookup_rejects_bad_port_and_backend() {
        let err = ConnectionConfig::from_lookup(lookup_from(&[
            (ENV_HOST, "localhost"),
            (ENV_PORT, "not-a-port"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains(ENV_PORT));

        let err = ConnectionConfig::from_lookup(lookup_from(&[
            (ENV_BACKEND, "mysql"),
            (ENV_HOST, "localhost"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("mysql"));
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn debug_and_serialize_hide_password() {
        let cfg = ConnectionConfig::postgres("localhost", "root", "hunter2");
        assert!(!format!("{cfg:?}").contains("hunter2"));
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(json.contains("\"postgres\""));
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn with_database_leaves_original_untouched() {
        let server = ConnectionConfig::postgres("localhost", "root", "pw");
        let scoped = server.with_database("school");
        assert_eq!(server.database(), None);
        assert_eq!(scoped.database(), Some("school"));
        assert_eq!(scoped.without_database().database(), None);
    }
}
