//! Required-column validation.
//!
//! Used as a gate before any source table is trusted.

use crate::error::{EngineError, EngineResult};

use super::SourceTable;

/// Returns the required columns absent from `table`, in the order given.
///
/// An empty result means the table is structurally valid.
///
/// # Example
///
/// ```
/// use allocation_engine::source::{SourceTable, missing_columns};
///
/// let table = SourceTable::from_str_rows::<&str>("roster", &["StaffNo", "Rank"], &[]);
/// assert_eq!(missing_columns(&table, &["StaffNo", "FTE", "Rank"]), vec!["FTE"]);
/// ```
pub fn missing_columns(table: &SourceTable, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|column| table.column_index(column).is_none())
        .map(|column| column.to_string())
        .collect()
}

/// Resolves the position of each required column.
///
/// Fails with `SourceSchemaInvalid` listing every missing column.
pub fn require_columns(table: &SourceTable, required: &[&str]) -> EngineResult<Vec<usize>> {
    let missing = missing_columns(table, required);
    if !missing.is_empty() {
        return Err(EngineError::SourceSchemaInvalid {
            source_name: table.name().to_string(),
            missing,
        });
    }

    Ok(required
        .iter()
        .filter_map(|column| table.column_index(column))
        .collect())
}
