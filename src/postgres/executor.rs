use super::connection::PostgresSession;
use super::params::Params;
use super::query::build_result_set_from_statement;
use crate::adapters::params::convert_params;
use crate::error::SchoolDbError;
use crate::results::ResultSet;
use crate::statement::StatementKind;
use crate::types::RowValues;

fn affected_rows(rows: u64) -> Result<usize, SchoolDbError> {
    usize::try_from(rows).map_err(|e| {
        SchoolDbError::ExecutionError(format!("postgres affected rows conversion error: {e}"))
    })
}

/// Run one unparameterized statement, committing if it mutates state.
///
/// `CREATE DATABASE` and friends cannot run inside a transaction block, so
/// database-level statements go straight through the simple query protocol.
///
/// # Errors
/// Returns the driver error; an open transaction is rolled back when dropped.
pub async fn execute_statement(
    session: &mut PostgresSession,
    sql: &str,
    kind: StatementKind,
) -> Result<usize, SchoolDbError> {
    match kind {
        StatementKind::Dml => {
            let tx = session.client.transaction().await?;
            let rows = tx.execute(sql, &[]).await?;
            tx.commit().await?;
            affected_rows(rows)
        }
        StatementKind::Ddl => {
            let tx = session.client.transaction().await?;
            tx.batch_execute(sql).await?;
            tx.commit().await?;
            Ok(0)
        }
        StatementKind::Query
            | StatementKind::DatabaseLevel
            | StatementKind::Transaction
            | StatementKind::Other => {
            session.client.batch_execute(sql).await?;
            Ok(0)
        }
    }
}

/// Run one parameterized DML statement inside its own transaction.
///
/// # Errors
/// Returns errors from preparation, execution, or commit.
pub async fn execute_dml(
    session: &mut PostgresSession,
    sql: &str,
    params: &[RowValues],
) -> Result<usize, SchoolDbError> {
    let converted = convert_params::<Params>(params)?;
    let tx = session.client.transaction().await?;
    let stmt = tx.prepare(sql).await?;
    let rows = tx.execute(&stmt, converted.as_refs()).await?;
    tx.commit().await?;
    affected_rows(rows)
}

/// Prepare `sql` once and execute it for every row inside one transaction.
///
/// # Errors
/// Returns the first failing row's error; nothing from the batch is committed.
pub async fn execute_many(
    session: &mut PostgresSession,
    sql: &str,
    rows: &[Vec<RowValues>],
) -> Result<usize, SchoolDbError> {
    let tx = session.client.transaction().await?;
    let stmt = tx.prepare(sql).await?;
    let mut affected = 0;
    for row in rows {
        let converted = convert_params::<Params>(row)?;
        affected += affected_rows(tx.execute(&stmt, converted.as_refs()).await?)?;
    }
    tx.commit().await?;
    Ok(affected)
}

/// Execute a read and materialize the full result set.
///
/// # Errors
/// Returns errors from preparation, execution, or value extraction.
pub async fn execute_select(
    session: &PostgresSession,
    sql: &str,
    params: &[RowValues],
) -> Result<ResultSet, SchoolDbError> {
    let converted = convert_params::<Params>(params)?;
    let stmt = session.client.prepare(sql).await?;
    let rows = session.client.query(&stmt, converted.as_refs()).await?;
    build_result_set_from_statement(&stmt, &rows)
}
