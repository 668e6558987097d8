//! In-memory source tables.
//!
//! A [`SourceTable`] is a named grid of optional string cells with a header
//! row. Cells are trimmed on the way in and blank cells become `None`, so
//! "empty" has one meaning everywhere downstream.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// One data row together with its 1-based position in the original table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRow {
    /// Position of the row among the data rows as loaded.
    pub number: usize,
    /// One cell per column.
    pub cells: Vec<Option<String>>,
}

impl SourceRow {
    /// Returns true if every cell in `columns` is empty.
    ///
    /// Cells outside `columns` are ignored, so a note in an unused column
    /// does not keep an otherwise empty row alive.
    pub fn is_blank_in(&self, columns: &[usize]) -> bool {
        columns.iter().all(|column| self.cell(*column).is_none())
    }

    /// The cell at `column`, if present and non-empty.
    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).and_then(|cell| cell.as_deref())
    }
}

/// A raw table as handed over by a loader.
///
/// # Example
///
/// ```
/// use allocation_engine::source::SourceTable;
///
/// let table = SourceTable::from_str_rows(
///     "cost_centres",
///     &["Value", "Description", "Enabled/ Disabled"],
///     &[vec!["001", "Admin", "Enabled"], vec!["", "", ""]],
/// );
/// assert_eq!(table.len(), 2);
/// assert!(table.rows()[1].is_blank_in(&[0, 1, 2]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<SourceRow>,
}

impl SourceTable {
    /// Creates a table, trimming cells and padding short rows to the header width.
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let columns: Vec<String> = columns.into_iter().map(|c| c.trim().to_string()).collect();
        let width = columns.len();

        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, cells)| {
                let mut cells: Vec<Option<String>> = cells.into_iter().map(clean_cell).collect();
                if cells.len() < width {
                    cells.resize(width, None);
                }
                SourceRow {
                    number: index + 1,
                    cells,
                }
            })
            .collect();

        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Creates a table from string literals; empty strings become empty cells.
    pub fn from_str_rows<S: AsRef<str>>(name: &str, columns: &[&str], rows: &[Vec<S>]) -> Self {
        Self::new(
            name,
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|cell| Some(cell.as_ref().to_string())).collect())
                .collect(),
        )
    }

    /// Reads a table from CSV.
    ///
    /// The first `header_row` records are skipped (title lines above the
    /// header), the next record supplies the column names and the rest are
    /// data rows. Ragged rows are accepted.
    pub fn from_csv_reader<R: Read>(name: &str, reader: R, header_row: usize) -> EngineResult<Self> {
        let unreadable = |message: String| EngineError::SourceUnreadable {
            source_name: name.to_string(),
            message,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = reader.records().skip(header_row);

        let headers: Vec<String> = match records.next() {
            Some(record) => record
                .map_err(|e| unreadable(e.to_string()))?
                .iter()
                .map(str::to_string)
                .collect(),
            None => return Err(unreadable(format!("no header found at row {}", header_row + 1))),
        };

        let mut rows = Vec::new();
        for record in records {
            let record = record.map_err(|e| unreadable(e.to_string()))?;
            rows.push(record.iter().map(|cell| Some(cell.to_string())).collect());
        }

        Ok(Self::new(name, headers, rows))
    }

    /// Reads a table from a CSV file. See [`SourceTable::from_csv_reader`].
    pub fn from_csv_path<P: AsRef<Path>>(name: &str, path: P, header_row: usize) -> EngineResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| EngineError::SourceUnreadable {
            source_name: name.to_string(),
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_csv_reader(name, file, header_row)
    }

    /// The logical table name used in errors and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The data rows.
    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Removes rows whose cells in `columns` are all empty, returning how
    /// many were removed.
    pub fn drop_blank_rows_in(&mut self, columns: &[usize]) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| !row.is_blank_in(columns));
        before - self.rows.len()
    }

    /// Removes the last row if its `column` cell is empty.
    ///
    /// Spreadsheet exports often end with a footer line that has no rank.
    pub fn drop_trailing_row_if_empty(&mut self, column: usize) -> bool {
        match self.rows.last() {
            Some(row) if row.cell(column).is_none() => {
                self.rows.pop();
                true
            }
            _ => false,
        }
    }

    /// Removes the first row if its `column` cell is empty.
    pub fn drop_leading_row_if_empty(&mut self, column: usize) -> bool {
        match self.rows.first() {
            Some(row) if row.cell(column).is_none() => {
                self.rows.remove(0);
                true
            }
            _ => false,
        }
    }
}

fn clean_cell(cell: Option<String>) -> Option<String> {
    cell.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
