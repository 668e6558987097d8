//! Source table intake.
//!
//! Loading raw tables (from CSV or built in memory), checking their headers
//! and coercing rows into typed records.

mod header_check;
mod records;
mod table;

pub use header_check::{missing_columns, require_columns};
pub use records::{
    normalize_cost_centre_code, normalize_identifier, parse_decimal, read_category_weights,
    read_cost_centres, read_extract, read_roster,
};
pub use table::{SourceRow, SourceTable};

use std::path::Path;

use crate::error::EngineResult;

/// The four tables that describe one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTables {
    /// Staff roster.
    pub roster: SourceTable,
    /// Allocation extract.
    pub extract: SourceTable,
    /// Cost centre reference table.
    pub cost_centres: SourceTable,
    /// Optional explicit category order.
    pub category_order: Option<SourceTable>,
}

impl SourceTables {
    /// Loads a period's tables from CSV files in `dir`.
    ///
    /// Expects `roster.csv`, `extract.csv` and `cost_centres.csv`; a
    /// `category_order.csv` is used when present. `header_row` applies to
    /// the extract, which usually carries a title line above its header.
    pub fn from_csv_dir<P: AsRef<Path>>(dir: P, header_row: usize) -> EngineResult<Self> {
        let dir = dir.as_ref();
        let order_path = dir.join("category_order.csv");

        let category_order = if order_path.exists() {
            Some(SourceTable::from_csv_path("category_order", &order_path, 0)?)
        } else {
            None
        };

        Ok(Self {
            roster: SourceTable::from_csv_path("roster", dir.join("roster.csv"), 0)?,
            extract: SourceTable::from_csv_path("extract", dir.join("extract.csv"), header_row)?,
            cost_centres: SourceTable::from_csv_path(
                "cost_centres",
                dir.join("cost_centres.csv"),
                0,
            )?,
            category_order,
        })
    }
}
