//! The scripted end-to-end CRUD tour of the school database.
//!
//! Each step is attempted in order. A failing step is logged and recorded and
//! the tour carries on, so one broken statement does not hide the outcome of
//! the rest.

use std::fmt;

use crate::db::SchoolDb;
use crate::error::SchoolDbError;
use crate::fixtures::{self, TEACHER_INSERT};
use crate::model::Entity;
use crate::queries::{self, SAMPLE_QUERIES};
use crate::results::Table;
use crate::schema::DEFAULT_DATABASE;

/// Outcome of one walkthrough step.
#[derive(Debug)]
pub struct StepOutcome {
    pub step: String,
    pub result: Result<StepOutput, SchoolDbError>,
}

/// What a successful step produced.
#[derive(Debug)]
pub enum StepOutput {
    Done,
    RowsAffected(usize),
    Rows(Table),
}

impl fmt::Display for StepOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutput::Done => write!(f, "ok"),
            StepOutput::RowsAffected(n) => write!(f, "{n} row(s) affected"),
            StepOutput::Rows(table) => write!(f, "{} row(s)\n{table}", table.len()),
        }
    }
}

#[derive(Debug, Default)]
pub struct WalkthroughReport {
    pub steps: Vec<StepOutcome>,
}

impl WalkthroughReport {
    fn record(&mut self, step: impl Into<String>, result: Result<StepOutput, SchoolDbError>) {
        let step = step.into();
        match &result {
            Ok(output) => tracing::info!(step = %step, "{output}"),
            Err(err) => tracing::error!(step = %step, kind = ?err.kind(), error = %err, "step failed"),
        }
        self.steps.push(StepOutcome { step, result });
    }

    pub fn successes(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| s.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| s.result.is_err())
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// The step with this name, if it ran.
    #[must_use]
    pub fn step(&self, name: &str) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.step == name)
    }
}

async fn read_labeled(db: &SchoolDb, sql: &str) -> Result<StepOutput, SchoolDbError> {
    Ok(StepOutput::Rows(db.read_query(sql).await?.into_labeled_table()?))
}

/// Run the full tour against the server `server` points at.
///
/// Creates the `school` database, builds the schema, loads the fixtures, runs
/// the sample reads, updates client 101's address, deletes and restores
/// course 20, then batch-inserts two more teachers.
pub async fn run(server: &SchoolDb) -> WalkthroughReport {
    let mut report = WalkthroughReport::default();

    report.record(
        "create database",
        server
            .create_database(DEFAULT_DATABASE)
            .await
            .map(|()| StepOutput::Done),
    );

    let db = server.for_database(DEFAULT_DATABASE);

    report.record(
        "create schema",
        db.create_schema().await.map(|()| StepOutput::Done),
    );
    report.record(
        "populate",
        db.populate().await.map(StepOutput::RowsAffected),
    );

    for query in SAMPLE_QUERIES {
        let result = match query.columns {
            Some(columns) => db.read_table(query.sql, columns).await.map(StepOutput::Rows),
            None => read_labeled(&db, query.sql).await,
        };
        report.record(query.name, result);
    }

    report.record(
        "update client 101 address",
        db.execute_query(queries::UPDATE_CLIENT_101_ADDRESS)
            .await
            .map(StepOutput::RowsAffected),
    );
    report.record("read client 101", read_labeled(&db, queries::CLIENT_101).await);

    report.record("read courses", read_labeled(&db, queries::ALL_COURSES).await);
    report.record(
        "delete course 20",
        db.execute_query(queries::DELETE_COURSE_20)
            .await
            .map(StepOutput::RowsAffected),
    );
    report.record(
        "read courses after delete",
        read_labeled(&db, queries::ALL_COURSES).await,
    );
    report.record(
        "restore course 20",
        db.execute_query(queries::RESTORE_COURSE_20)
            .await
            .map(StepOutput::RowsAffected),
    );

    let extra: Vec<_> = fixtures::extra_teachers()
        .iter()
        .map(Entity::to_params)
        .collect();
    report.record(
        "insert extra teachers",
        db.execute_list_query(TEACHER_INSERT, &extra)
            .await
            .map(StepOutput::RowsAffected),
    );
    report.record("read teachers", read_labeled(&db, queries::ALL_TEACHERS).await);

    tracing::info!(
        steps = report.steps.len(),
        failed = report.failures().count(),
        "walkthrough finished"
    );
    report
}
