//! Typed rows for the five school tables.
//!
//! Each entity knows its table, its column order, how to turn itself into
//! bind values for an insert, and how to read itself back out of a result row.

use chrono::NaiveDate;

use crate::error::SchoolDbError;
use crate::results::CustomDbRow;
use crate::types::RowValues;

/// A table-backed record.
pub trait Entity: Sized {
    const TABLE: &'static str;
    /// Column names in table-definition order.
    const COLUMNS: &'static [&'static str];
    /// Primary key column(s), used for stable ordering.
    const ORDER_BY: &'static str;

    /// Values in `COLUMNS` order.
    fn to_params(&self) -> Vec<RowValues>;

    /// Rebuild the record from a row that contains every column by name.
    ///
    /// # Errors
    /// Returns `SchoolDbError::ReadError` when a column is missing or has the wrong type.
    fn from_row(row: &CustomDbRow) -> Result<Self, SchoolDbError>;

    /// `INSERT INTO <table> (<columns>) VALUES (%s, ...)`.
    #[must_use]
    fn insert_template() -> String {
        let placeholders = vec!["%s"; Self::COLUMNS.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            Self::TABLE,
            Self::COLUMNS.join(", ")
        )
    }

    /// `SELECT <columns> FROM <table> ORDER BY <key>`.
    #[must_use]
    fn select_all() -> String {
        format!(
            "SELECT {} FROM {} ORDER BY {}",
            Self::COLUMNS.join(", "),
            Self::TABLE,
            Self::ORDER_BY
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teacher {
    pub teacher_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub language_1: String,
    pub language_2: Option<String>,
    pub dob: Option<NaiveDate>,
    pub tax_id: Option<i64>,
    pub phone_no: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub client_id: i64,
    pub client_name: String,
    pub address: String,
    pub industry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub participant_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_no: Option<String>,
    pub client: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub course_id: i64,
    pub course_name: String,
    pub language: String,
    pub level: Option<String>,
    pub course_length_weeks: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub in_school: Option<bool>,
    pub teacher: Option<i64>,
    pub client: Option<i64>,
}

/// A `takes_course` link between a participant and a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enrollment {
    pub participant_id: i64,
    pub course_id: i64,
}

impl Entity for Teacher {
    const TABLE: &'static str = "teacher";
    const COLUMNS: &'static [&'static str] = &[
        "teacher_id",
        "first_name",
        "last_name",
        "language_1",
        "language_2",
        "dob",
        "tax_id",
        "phone_no",
    ];
    const ORDER_BY: &'static str = "teacher_id";

    fn to_params(&self) -> Vec<RowValues> {
        vec![
            RowValues::Int(self.teacher_id),
            RowValues::Text(self.first_name.clone()),
            RowValues::Text(self.last_name.clone()),
            RowValues::Text(self.language_1.clone()),
            self.language_2.as_deref().into(),
            self.dob.into(),
            self.tax_id.into(),
            self.phone_no.as_deref().into(),
        ]
    }

    fn from_row(row: &CustomDbRow) -> Result<Self, SchoolDbError> {
        Ok(Self {
            teacher_id: int(row, "teacher_id")?,
            first_name: text(row, "first_name")?,
            last_name: text(row, "last_name")?,
            language_1: text(row, "language_1")?,
            language_2: opt(row, "language_2", |v| v.as_text().map(str::to_string))?,
            dob: opt(row, "dob", RowValues::as_date)?,
            tax_id: opt(row, "tax_id", |v| v.as_int().copied())?,
            phone_no: opt(row, "phone_no", |v| v.as_text().map(str::to_string))?,
        })
    }
}

impl Entity for Client {
    const TABLE: &'static str = "client";
    const COLUMNS: &'static [&'static str] = &["client_id", "client_name", "address", "industry"];
    const ORDER_BY: &'static str = "client_id";

    fn to_params(&self) -> Vec<RowValues> {
        vec![
            RowValues::Int(self.client_id),
            RowValues::Text(self.client_name.clone()),
            RowValues::Text(self.address.clone()),
            self.industry.as_deref().into(),
        ]
    }

    fn from_row(row: &CustomDbRow) -> Result<Self, SchoolDbError> {
        Ok(Self {
            client_id: int(row, "client_id")?,
            client_name: text(row, "client_name")?,
            address: text(row, "address")?,
            industry: opt(row, "industry", |v| v.as_text().map(str::to_string))?,
        })
    }
}

impl Entity for Participant {
    const TABLE: &'static str = "participant";
    const COLUMNS: &'static [&'static str] = &[
        "participant_id",
        "first_name",
        "last_name",
        "phone_no",
        "client",
    ];
    const ORDER_BY: &'static str = "participant_id";

    fn to_params(&self) -> Vec<RowValues> {
        vec![
            RowValues::Int(self.participant_id),
            RowValues::Text(self.first_name.clone()),
            RowValues::Text(self.last_name.clone()),
            self.phone_no.as_deref().into(),
            self.client.into(),
        ]
    }

    fn from_row(row: &CustomDbRow) -> Result<Self, SchoolDbError> {
        Ok(Self {
            participant_id: int(row, "participant_id")?,
            first_name: text(row, "first_name")?,
            last_name: text(row, "last_name")?,
            phone_no: opt(row, "phone_no", |v| v.as_text().map(str::to_string))?,
            client: opt(row, "client", |v| v.as_int().copied())?,
        })
    }
}

impl Entity for Course {
    const TABLE: &'static str = "course";
    const COLUMNS: &'static [&'static str] = &[
        "course_id",
        "course_name",
        "language",
        "level",
        "course_length_weeks",
        "start_date",
        "in_school",
        "teacher",
        "client",
    ];
    const ORDER_BY: &'static str = "course_id";

    fn to_params(&self) -> Vec<RowValues> {
        vec![
            RowValues::Int(self.course_id),
            RowValues::Text(self.course_name.clone()),
            RowValues::Text(self.language.clone()),
            self.level.as_deref().into(),
            self.course_length_weeks.into(),
            self.start_date.into(),
            self.in_school.into(),
            self.teacher.into(),
            self.client.into(),
        ]
    }

    fn from_row(row: &CustomDbRow) -> Result<Self, SchoolDbError> {
        Ok(Self {
            course_id: int(row, "course_id")?,
            course_name: text(row, "course_name")?,
            language: text(row, "language")?,
            level: opt(row, "level", |v| v.as_text().map(str::to_string))?,
            course_length_weeks: opt(row, "course_length_weeks", |v| v.as_int().copied())?,
            start_date: opt(row, "start_date", RowValues::as_date)?,
            in_school: opt(row, "in_school", RowValues::as_bool)?,
            teacher: opt(row, "teacher", |v| v.as_int().copied())?,
            client: opt(row, "client", |v| v.as_int().copied())?,
        })
    }
}

impl Entity for Enrollment {
    const TABLE: &'static str = "takes_course";
    const COLUMNS: &'static [&'static str] = &["participant_id", "course_id"];
    const ORDER_BY: &'static str = "participant_id, course_id";

    fn to_params(&self) -> Vec<RowValues> {
        vec![
            RowValues::Int(self.participant_id),
            RowValues::Int(self.course_id),
        ]
    }

    fn from_row(row: &CustomDbRow) -> Result<Self, SchoolDbError> {
        Ok(Self {
            participant_id: int(row, "participant_id")?,
            course_id: int(row, "course_id")?,
        })
    }
}

fn column<'r>(row: &'r CustomDbRow, name: &str) -> Result<&'r RowValues, SchoolDbError> {
    row.get(name)
        .ok_or_else(|| SchoolDbError::ReadError(format!("column '{name}' missing from row")))
}

fn mistyped(name: &str, value: &RowValues) -> SchoolDbError {
    SchoolDbError::ReadError(format!("column '{name}' has unexpected value {value:?}"))
}

fn int(row: &CustomDbRow, name: &str) -> Result<i64, SchoolDbError> {
    let value = column(row, name)?;
    value.as_int().copied().ok_or_else(|| mistyped(name, value))
}

fn text(row: &CustomDbRow, name: &str) -> Result<String, SchoolDbError> {
    let value = column(row, name)?;
    value
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| mistyped(name, value))
}

/// NULL maps to `None`; any other value must convert.
fn opt<T>(
    row: &CustomDbRow,
    name: &str,
    convert: impl Fn(&RowValues) -> Option<T>,
) -> Result<Option<T>, SchoolDbError> {
    let value = column(row, name)?;
    if value.is_null() {
        return Ok(None);
    }
    convert(value).map(Some).ok_or_else(|| mistyped(name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn insert_template_lists_every_column() {
        assert_eq!(
            Client::insert_template(),
            "INSERT INTO client (client_id, client_name, address, industry) VALUES (%s, %s, %s, %s)"
        );
        assert_eq!(
            Enrollment::select_all(),
            "SELECT participant_id, course_id FROM takes_course ORDER BY participant_id, course_id"
        );
    }

    #[test]
    fn course_round_trips_through_a_row() {
        let course = Course {
            course_id: 12,
            course_name: "English for Logistics".into(),
            language: "ENG".into(),
            level: Some("A1".into()),
            course_length_weeks: Some(10),
            start_date: NaiveDate::from_ymd_opt(2020, 2, 1),
            in_school: Some(true),
            teacher: Some(1),
            client: None,
        };
        let names = Arc::new(Course::COLUMNS.iter().map(|c| (*c).to_string()).collect());
        // SQLite hands dates back as text and booleans as integers.
        let mut values = course.to_params();
        values[5] = RowValues::Text("2020-02-01".into());
        values[6] = RowValues::Int(1);
        let row = CustomDbRow::new(names, values);

        assert_eq!(Course::from_row(&row).unwrap(), course);
    }

    #[test]
    fn wrong_type_is_a_read_error() {
        let names = Arc::new(vec!["client_id".to_string()]);
        let row = CustomDbRow::new(names, vec![RowValues::Text("101".into())]);
        let err = int(&row, "client_id").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Read);
        assert!(int(&row, "missing").is_err());
    }
}
