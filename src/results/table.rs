use std::fmt;

use crate::error::SchoolDbError;
use crate::types::RowValues;

/// Rows labeled with caller-chosen column names, for analysis and display.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<RowValues>>,
}

impl Table {
    /// Build a table, checking that every row is as wide as the header.
    ///
    /// # Errors
    /// Returns `SchoolDbError::ParameterError` on a width mismatch.
    pub fn new<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<RowValues>>,
    ) -> Result<Self, SchoolDbError> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(SchoolDbError::ParameterError(format!(
                "row {idx} has {} values but {} column labels were given",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<RowValues>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, top to bottom.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<&RowValues>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_line(f, &self.columns, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(f, &rule, &widths)?;
        for row in &cells {
            write_line(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let mut first = true;
    for (cell, width) in cells.iter().zip(widths) {
        if !first {
            f.write_str(" | ")?;
        }
        first = false;
        let pad = width.saturating_sub(cell.chars().count());
        write!(f, "{cell}{}", " ".repeat(pad))?;
    }
    writeln!(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            ["course_id", "course_name"],
            vec![
                vec![RowValues::Int(13), RowValues::Text("Beginner English".into())],
                vec![RowValues::Int(20), RowValues::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_width_mismatch() {
        let err = Table::new(["only_one"], vec![vec![RowValues::Int(1), RowValues::Int(2)]])
            .unwrap_err();
        assert!(err.to_string().contains("row 0 has 2 values"));
    }

    #[test]
    fn column_lookup_by_label() {
        let table = sample();
        let ids = table.column("course_id").unwrap();
        assert_eq!(ids, vec![&RowValues::Int(13), &RowValues::Int(20)]);
        assert!(table.column("missing").is_none());
    }

    #[test]
    fn display_aligns_columns() {
        let rendered = sample().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "course_id | course_name     ");
        assert_eq!(lines[1], "--------- | ----------------");
        assert_eq!(lines[2], "13        | Beginner English");
        assert_eq!(lines[3], "20        | NULL            ");
    }
}
