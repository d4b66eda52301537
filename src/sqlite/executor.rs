use crate::adapters::params::convert_params;
use crate::error::SchoolDbError;
use crate::results::ResultSet;
use crate::statement::StatementKind;
use crate::types::RowValues;

use super::connection::SqliteSession;
use super::params::Params;
use super::query::build_result_set;

/// Run one unparameterized statement, committing if it mutates state.
///
/// # Errors
/// Returns the driver error if the statement or commit fails; the
/// transaction is rolled back in that case.
pub async fn execute_statement(
    session: &SqliteSession,
    sql: &str,
    kind: StatementKind,
) -> Result<usize, SchoolDbError> {
    let sql_owned = sql.to_owned();
    session
        .with_connection(move |conn| match kind {
            StatementKind::Dml => {
                let tx = conn.transaction()?;
                let affected = tx.execute(&sql_owned, [])?;
                tx.commit()?;
                Ok(affected)
            }
            StatementKind::Ddl => {
                let tx = conn.transaction()?;
                tx.execute_batch(&sql_owned)?;
                tx.commit()?;
                Ok(0)
            }
            StatementKind::Query
            | StatementKind::DatabaseLevel
            | StatementKind::Transaction
            | StatementKind::Other => {
                conn.execute_batch(&sql_owned)?;
                Ok(0)
            }
        })
        .await
}

/// Run one parameterized DML statement inside its own transaction.
///
/// # Errors
/// Returns the driver error if preparing, executing, or committing fails.
pub async fn execute_dml(
    session: &SqliteSession,
    sql: &str,
    params: &[RowValues],
) -> Result<usize, SchoolDbError> {
    let params_owned = convert_params::<Params>(params)?;
    let sql_owned = sql.to_owned();
    session
        .with_connection(move |conn| {
            let tx = conn.transaction()?;
            let affected = {
                let mut stmt = tx.prepare(&sql_owned)?;
                stmt.execute(&params_owned.as_refs()[..])?
            };
            tx.commit()?;
            Ok(affected)
        })
        .await
}

/// Bind every row to `sql` and execute them in one transaction.
///
/// Any failing row drops the transaction, which rolls back the rows already
/// executed.
///
/// # Errors
/// Returns the first driver error encountered.
pub async fn execute_many(
    session: &SqliteSession,
    sql: &str,
    rows: &[Vec<RowValues>],
) -> Result<usize, SchoolDbError> {
    let converted = rows
        .iter()
        .map(|row| convert_params::<Params>(row))
        .collect::<Result<Vec<_>, _>>()?;
    let sql_owned = sql.to_owned();
    session
        .with_connection(move |conn| {
            let tx = conn.transaction()?;
            let mut affected = 0;
            {
                let mut stmt = tx.prepare(&sql_owned)?;
                for params in &converted {
                    affected += stmt.execute(&params.as_refs()[..])?;
                }
            }
            tx.commit()?;
            Ok(affected)
        })
        .await
}

/// Execute a read and materialize the full result set.
///
/// # Errors
/// Returns the driver error if preparing or stepping the query fails.
pub async fn execute_select(
    session: &SqliteSession,
    sql: &str,
    params: &[RowValues],
) -> Result<ResultSet, SchoolDbError> {
    let params_owned = convert_params::<Params>(params)?.0;
    let sql_owned = sql.to_owned();
    session
        .with_connection(move |conn| {
            let mut stmt = conn.prepare(&sql_owned)?;
            build_result_set(&mut stmt, &params_owned)
        })
        .await
}
