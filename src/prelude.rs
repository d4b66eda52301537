//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::config::{ConnectionConfig, ConnectionConfigBuilder};
pub use crate::db::SchoolDb;
pub use crate::error::{ErrorKind, SchoolDbError};
pub use crate::executor::{
    create_database, execute_dml, execute_list_query, execute_query, read_query,
    read_query_with_params,
};
pub use crate::model::{Client, Course, Enrollment, Entity, Participant, Teacher};
pub use crate::results::{CustomDbRow, ResultSet, Table};
pub use crate::session::{Session, connect_or_log};
pub use crate::translation::{PlaceholderStyle, translate_placeholders};
pub use crate::types::{DatabaseType, RowValues};
pub use crate::walkthrough::WalkthroughReport;
