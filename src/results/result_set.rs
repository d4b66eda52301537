use std::collections::HashMap;
use std::sync::Arc;

use super::row::{CustomDbRow, index_columns};
use super::table::Table;
use crate::error::SchoolDbError;
use crate::types::RowValues;

/// The fully materialized result of a read.
///
/// Rows keep the order the server returned them in; values inside each row
/// keep the SELECT-clause order.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<CustomDbRow>,
    column_names: Option<Arc<Vec<String>>>,
    column_index: Arc<HashMap<String, usize>>,
}

impl ResultSet {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            column_names: None,
            column_index: Arc::default(),
        }
    }

    /// Set the column names shared by all rows.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index = Arc::new(index_columns(&column_names));
        self.column_names = Some(column_names);
    }

    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Append a row. Ignored until column names have been set.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        if let Some(column_names) = &self.column_names {
            self.results.push(CustomDbRow {
                column_names: Arc::clone(column_names),
                rows: row_values,
                column_index_cache: Arc::clone(&self.column_index),
            });
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Plain list-of-lists view of the rows.
    #[must_use]
    pub fn rows_as_lists(&self) -> Vec<Vec<RowValues>> {
        self.results.iter().map(|row| row.rows.clone()).collect()
    }

    /// Label the rows with caller-supplied column names.
    ///
    /// # Errors
    /// Returns `SchoolDbError::ParameterError` when the number of labels does not
    /// match the width of the rows.
    pub fn into_table<S: Into<String>>(
        self,
        columns: impl IntoIterator<Item = S>,
    ) -> Result<Table, SchoolDbError> {
        let rows = self.results.into_iter().map(|row| row.rows).collect();
        Table::new(columns, rows)
    }

    /// Label the rows with the column names the server reported.
    ///
    /// # Errors
    /// Returns `SchoolDbError::ParameterError` if no column names are known.
    pub fn into_labeled_table(self) -> Result<Table, SchoolDbError> {
        let columns = self
            .column_names
            .as_ref()
            .map(|names| names.as_ref().clone())
            .ok_or_else(|| SchoolDbError::ParameterError("No column names available".into()))?;
        self.into_table(columns)
    }
}
