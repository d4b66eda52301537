//! Create, populate, and query the International Language School database.
//!
//! The crate opens one session at a time against `PostgreSQL`
//! (`tokio-postgres`) or `SQLite` (`rusqlite`), and exposes four operations on
//! it: run a statement, run a statement once per row of bound values, read a
//! query into memory, and create a database. On top of that sit the school
//! schema, its fixture data, typed row models, and a scripted walkthrough.
//!
//! ```no_run
//! use school_db::prelude::*;
//!
//! # async fn demo() -> Result<(), SchoolDbError> {
//! let db = SchoolDb::new(ConnectionConfig::sqlite("school.db"));
//! db.create_schema().await?;
//! db.populate().await?;
//! let table = db
//!     .read_table("SELECT last_name, dob FROM teacher", &["last_name", "dob"])
//!     .await?;
//! println!("{table}");
//! # Ok(())
//! # }
//! ```

#[cfg(not(any(feature = "postgres", feature = "sqlite")))]
compile_error!("enable at least one of the `postgres` or `sqlite` features");

mod adapters;

pub mod config;
pub mod db;
pub mod error;
pub mod executor;
pub mod fixtures;
pub mod model;
pub mod prelude;
pub mod queries;
pub mod results;
pub mod schema;
pub mod session;
pub mod statement;
pub mod translation;
pub mod types;
pub mod walkthrough;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "test-utils-postgres")]
pub mod test_utils;

pub use config::{ConnectionConfig, ConnectionConfigBuilder};
pub use db::SchoolDb;
pub use error::{ErrorKind, SchoolDbError};
pub use executor::{
    create_database, execute_dml, execute_list_query, execute_query, read_query,
    read_query_with_params,
};
pub use results::{CustomDbRow, ResultSet, Table};
pub use session::{Session, connect_or_log};
pub use types::{DatabaseType, RowValues};
