use crate::error::SchoolDbError;
use crate::types::{ParamConverter, RowValues};

/// Convert a single `RowValues` to a rusqlite `Value`.
///
/// `SQLite` has no native date or boolean types: dates are stored as
/// `YYYY-MM-DD` text and booleans as 0/1.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> rusqlite::types::Value {
    use rusqlite::types::Value;
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Date(d) => Value::Text(d.format("%Y-%m-%d").to_string()),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Owned `SQLite` parameter list.
#[derive(Debug, Clone)]
pub struct Params(pub Vec<rusqlite::types::Value>);

impl Params {
    /// Convert row values into `SQLite` values.
    ///
    /// # Errors
    ///
    /// Never fails; returns `Result` to match the Postgres converter.
    pub fn convert(params: &[RowValues]) -> Result<Self, SchoolDbError> {
        Ok(Params(params.iter().map(row_value_to_sqlite_value).collect()))
    }

    /// Borrowed params slice suitable for rusqlite execution.
    #[must_use]
    pub fn as_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.0.iter().map(|v| v as &dyn rusqlite::ToSql).collect()
    }
}

impl ParamConverter<'_> for Params {
    type Converted = Params;

    fn convert_sql_params(params: &[RowValues]) -> Result<Self::Converted, SchoolDbError> {
        Self::convert(params)
    }
}
