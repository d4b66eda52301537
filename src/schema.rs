//! DDL for the language-school database.
//!
//! Five tables: `teacher`, `client`, `participant`, `course`, and the
//! associative `takes_course`. Deleting a teacher or client nulls the
//! references to it; deleting a participant or course removes its
//! enrollments.

use crate::error::SchoolDbError;
use crate::executor::execute_query;
use crate::session::Session;
use crate::types::DatabaseType;

/// Name of the database the walkthrough creates.
pub const DEFAULT_DATABASE: &str = "school";

pub const CREATE_DATABASE: &str = "CREATE DATABASE school";

pub const CREATE_TEACHER_TABLE: &str = r"
CREATE TABLE teacher (
  teacher_id INT PRIMARY KEY,
  first_name VARCHAR(40) NOT NULL,
  last_name VARCHAR(40) NOT NULL,
  language_1 VARCHAR(3) NOT NULL,
  language_2 VARCHAR(3),
  dob DATE,
  tax_id INT UNIQUE,
  phone_no VARCHAR(20)
)";

pub const CREATE_CLIENT_TABLE: &str = r"
CREATE TABLE client (
  client_id INT PRIMARY KEY,
  client_name VARCHAR(40) NOT NULL,
  address VARCHAR(60) NOT NULL,
  industry VARCHAR(20)
)";

pub const CREATE_PARTICIPANT_TABLE: &str = r"
CREATE TABLE participant (
  participant_id INT PRIMARY KEY,
  first_name VARCHAR(40) NOT NULL,
  last_name VARCHAR(40) NOT NULL,
  phone_no VARCHAR(20),
  client INT
)";

pub const CREATE_COURSE_TABLE: &str = r"
CREATE TABLE course (
  course_id INT PRIMARY KEY,
  course_name VARCHAR(40) NOT NULL,
  language VARCHAR(3) NOT NULL,
  level VARCHAR(2),
  course_length_weeks INT,
  start_date DATE,
  in_school BOOLEAN,
  teacher INT,
  client INT
)";

pub const ALTER_PARTICIPANT: &str = r"
ALTER TABLE participant
ADD FOREIGN KEY(client)
REFERENCES client(client_id)
ON DELETE SET NULL";

pub const ALTER_COURSE_TEACHER: &str = r"
ALTER TABLE course
ADD FOREIGN KEY(teacher)
REFERENCES teacher(teacher_id)
ON DELETE SET NULL";

pub const ALTER_COURSE_CLIENT: &str = r"
ALTER TABLE course
ADD FOREIGN KEY(client)
REFERENCES client(client_id)
ON DELETE SET NULL";

pub const CREATE_TAKES_COURSE_TABLE: &str = r"
CREATE TABLE takes_course (
  participant_id INT,
  course_id INT,
  PRIMARY KEY(participant_id, course_id),
  FOREIGN KEY(participant_id) REFERENCES participant(participant_id) ON DELETE CASCADE,
  FOREIGN KEY(course_id) REFERENCES course(course_id) ON DELETE CASCADE
)";

/// Tables created before their foreign keys are added (Postgres order).
pub const TABLES: [&str; 4] = [
    CREATE_TEACHER_TABLE,
    CREATE_CLIENT_TABLE,
    CREATE_PARTICIPANT_TABLE,
    CREATE_COURSE_TABLE,
];

/// Foreign keys added to existing tables.
pub const FOREIGN_KEYS: [&str; 3] = [ALTER_PARTICIPANT, ALTER_COURSE_TEACHER, ALTER_COURSE_CLIENT];

// SQLite cannot add a constraint to an existing table, so its participant and
// course tables carry the same foreign keys inline.

pub const SQLITE_CREATE_PARTICIPANT_TABLE: &str = r"
CREATE TABLE participant (
  participant_id INT PRIMARY KEY,
  first_name VARCHAR(40) NOT NULL,
  last_name VARCHAR(40) NOT NULL,
  phone_no VARCHAR(20),
  client INT,
  FOREIGN KEY(client) REFERENCES client(client_id) ON DELETE SET NULL
)";

pub const SQLITE_CREATE_COURSE_TABLE: &str = r"
CREATE TABLE course (
  course_id INT PRIMARY KEY,
  course_name VARCHAR(40) NOT NULL,
  language VARCHAR(3) NOT NULL,
  level VARCHAR(2),
  course_length_weeks INT,
  start_date DATE,
  in_school BOOLEAN,
  teacher INT,
  client INT,
  FOREIGN KEY(teacher) REFERENCES teacher(teacher_id) ON DELETE SET NULL,
  FOREIGN KEY(client) REFERENCES client(client_id) ON DELETE SET NULL
)";

/// Children first, so every drop succeeds with foreign keys enforced.
pub const DROP_TABLES: [&str; 5] = [
    "DROP TABLE IF EXISTS takes_course",
    "DROP TABLE IF EXISTS course",
    "DROP TABLE IF EXISTS participant",
    "DROP TABLE IF EXISTS client",
    "DROP TABLE IF EXISTS teacher",
];

/// Table names in dependency order (parents first).
pub const TABLE_NAMES: [&str; 5] = ["teacher", "client", "participant", "course", "takes_course"];

/// The DDL sequence that builds the schema on `db_type`.
#[must_use]
pub fn statements(db_type: DatabaseType) -> Vec<&'static str> {
    match db_type {
        #[cfg(feature = "postgres")]
        DatabaseType::Postgres => TABLES
            .iter()
            .chain(FOREIGN_KEYS.iter())
            .chain(std::iter::once(&CREATE_TAKES_COURSE_TABLE))
            .copied()
            .collect(),
        #[cfg(feature = "sqlite")]
        DatabaseType::Sqlite => vec![
            CREATE_TEACHER_TABLE,
            CREATE_CLIENT_TABLE,
            SQLITE_CREATE_PARTICIPANT_TABLE,
            SQLITE_CREATE_COURSE_TABLE,
            CREATE_TAKES_COURSE_TABLE,
        ],
    }
}

/// Create all five tables and their constraints, one statement at a time.
///
/// # Errors
/// Stops at and returns the first failing statement's error (e.g. a table
/// that already exists).
pub async fn create_schema(session: &mut Session) -> Result<(), SchoolDbError> {
    for sql in statements(session.db_type()) {
        execute_query(session, sql).await?;
    }
    tracing::info!("schema created");
    Ok(())
}

/// Drop all five tables if they exist.
///
/// # Errors
/// Returns the first failing statement's error.
pub async fn drop_schema(session: &mut Session) -> Result<(), SchoolDbError> {
    for sql in DROP_TABLES {
        execute_query(session, sql).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "postgres")]
    #[test]
    fn postgres_adds_foreign_keys_before_link_table() {
        let stmts = statements(DatabaseType::Postgres);
        assert_eq!(stmts.len(), 8);
        assert_eq!(stmts[4], ALTER_PARTICIPANT);
        assert_eq!(stmts[7], CREATE_TAKES_COURSE_TABLE);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_declares_foreign_keys_inline() {
        let stmts = statements(DatabaseType::Sqlite);
        assert_eq!(stmts.len(), 5);
        assert!(stmts.iter().all(|s| !s.contains("ALTER TABLE")));
        let set_null = stmts.iter().filter(|s| s.contains("ON DELETE SET NULL")).count();
        assert_eq!(set_null, 2);
        assert_eq!(stmts.iter().map(|s| s.matches("SET NULL").count()).sum::<usize>(), 3);
    }
}
