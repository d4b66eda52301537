use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use school_db::config::{
    ENV_BACKEND, ENV_DATABASE, ENV_HOST, ENV_PASSWORD, ENV_PORT, ENV_USER, default_backend,
};
use school_db::schema::DEFAULT_DATABASE;
use school_db::{ConnectionConfig, DatabaseType, SchoolDbError};

#[derive(Parser, Debug)]
#[command(author, version, about = "Create, populate, and query the language-school database")]
pub(crate) struct Args {
    /// Backend to connect to (defaults to postgres when compiled in)
    #[arg(long, value_enum, env = ENV_BACKEND, global = true)]
    pub(crate) backend: Option<DatabaseType>,
    /// Server host, or the database file for sqlite
    #[arg(long, env = ENV_HOST, default_value = "localhost", global = true)]
    pub(crate) host: String,
    #[arg(long, env = ENV_PORT, global = true)]
    pub(crate) port: Option<u16>,
    #[arg(long, env = ENV_USER, global = true)]
    pub(crate) user: Option<String>,
    #[arg(long, env = ENV_PASSWORD, hide_env_values = true, global = true)]
    pub(crate) password: Option<String>,
    /// Database to scope the session to (postgres defaults to the school
    /// database for everything but create-database)
    #[arg(long, env = ENV_DATABASE, global = true)]
    pub(crate) database: Option<String>,
    /// Also write the log to this file
    #[arg(long, global = true)]
    pub(crate) log: Option<PathBuf>,
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Command {
    /// Create a database on the server
    CreateDatabase {
        #[arg(default_value = DEFAULT_DATABASE)]
        name: String,
    },
    /// Create the schema and load the fixture data
    Init,
    /// Execute one statement and commit it
    Exec { sql: String },
    /// Run a read-only query and print the rows
    Query {
        sql: String,
        /// Comma-separated labels for the result columns
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// Run the scripted CRUD walkthrough
    Walkthrough,
}

/// Effective settings, logged at startup.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CliConfig {
    pub(crate) connection: ConnectionConfig,
    pub(crate) command: Command,
    pub(crate) log: Option<PathBuf>,
    pub(crate) verbose: bool,
}

impl CliConfig {
    pub(crate) fn from_args(args: Args) -> Result<Self, SchoolDbError> {
        let db_type = match args.backend {
            Some(db_type) => db_type,
            None => default_backend()?,
        };
        let mut builder = ConnectionConfig::builder(db_type, args.host);
        if let Some(port) = args.port {
            builder = builder.port(port);
        }
        if let Some(user) = args.user {
            builder = builder.user(user);
        }
        if let Some(password) = args.password {
            builder = builder.password(password);
        }
        if let Some(database) = args
            .database
            .or_else(|| default_database(db_type, &args.command))
        {
            builder = builder.database(database);
        }
        Ok(CliConfig {
            connection: builder.finish(),
            command: args.command,
            log: args.log,
            verbose: args.verbose,
        })
    }
}

/// Server-backed commands other than `create-database` work inside the school
/// database, not the maintenance database the server session lands in.
fn default_database(db_type: DatabaseType, command: &Command) -> Option<String> {
    #[cfg(feature = "postgres")]
    if db_type == DatabaseType::Postgres && !matches!(command, Command::CreateDatabase { .. }) {
        return Some(DEFAULT_DATABASE.to_string());
    }
    #[cfg(not(feature = "postgres"))]
    let _ = (db_type, command);
    None
}
