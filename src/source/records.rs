//! Typed coercion of source tables.
//!
//! Each reader validates its table's header, then converts every row into a
//! typed record. Blank rows must already be gone; a required cell that is
//! still empty or malformed here is a `SourceDataInvalid` error naming the
//! table, the row and the column.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::config::{CategoryOrderColumns, CostCentreColumns, ExtractColumns, RosterColumns};
use crate::error::{EngineError, EngineResult};
use crate::models::{AllocationExtractRecord, CostCentreDirectory, CostCentreInfo, StaffRecord};

use super::header_check::require_columns;
use super::table::{SourceRow, SourceTable};

/// Canonical form of an identifier cell.
///
/// Spreadsheet exports turn `123` into `123.0` or keep a leading zero; any
/// value that is a whole number is written back as a plain integer so both
/// sources agree. Anything else is kept as trimmed text.
///
/// # Example
///
/// ```
/// use allocation_engine::source::normalize_identifier;
///
/// assert_eq!(normalize_identifier("0123"), "123");
/// assert_eq!(normalize_identifier(" 123.0 "), "123");
/// assert_eq!(normalize_identifier("A-17"), "A-17");
/// ```
pub fn normalize_identifier(raw: &str) -> String {
    let trimmed = raw.trim();
    match Decimal::from_str(trimmed) {
        Ok(value) if value.fract().is_zero() => value.trunc().normalize().to_string(),
        _ => trimmed.to_string(),
    }
}

/// Canonical cost centre code: a normalized identifier left-padded with
/// zeros to `width`.
///
/// ```
/// use allocation_engine::source::normalize_cost_centre_code;
///
/// assert_eq!(normalize_cost_centre_code("1", 3), "001");
/// assert_eq!(normalize_cost_centre_code("12.0", 3), "012");
/// assert_eq!(normalize_cost_centre_code("1234", 3), "1234");
/// ```
pub fn normalize_cost_centre_code(raw: &str, width: usize) -> String {
    format!("{:0>width$}", normalize_identifier(raw), width = width)
}

/// Parses a numeric cell. Plain and scientific notation are accepted.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

struct RowReader<'a> {
    table: &'a SourceTable,
    row: &'a SourceRow,
}

impl<'a> RowReader<'a> {
    fn new(table: &'a SourceTable, row: &'a SourceRow) -> Self {
        Self { table, row }
    }

    fn error(&self, column: usize, message: &str) -> EngineError {
        let name = self
            .table
            .columns()
            .get(column)
            .map(String::as_str)
            .unwrap_or("?");
        EngineError::data_invalid(
            self.table.name(),
            format!("row {}, column '{}': {}", self.row.number, name, message),
        )
    }

    fn text(&self, column: usize) -> EngineResult<&'a str> {
        self.row
            .cell(column)
            .ok_or_else(|| self.error(column, "value is empty"))
    }

    fn optional_text(&self, column: usize) -> &'a str {
        self.row.cell(column).unwrap_or_default()
    }

    fn decimal(&self, column: usize) -> EngineResult<Decimal> {
        let raw = self.text(column)?;
        parse_decimal(raw).ok_or_else(|| self.error(column, &format!("'{}' is not a number", raw)))
    }
}

/// Reads the roster into staff records, in table order.
pub fn read_roster(
    table: &SourceTable,
    columns: &RosterColumns,
    code_width: usize,
) -> EngineResult<Vec<StaffRecord>> {
    let idx = require_columns(table, &columns.required())?;
    let (staff_id, rank, section, category, fte, default_cc) =
        (idx[0], idx[1], idx[2], idx[3], idx[4], idx[5]);

    table
        .rows()
        .iter()
        .map(|row| {
            let reader = RowReader::new(table, row);
            let fte_value = reader.decimal(fte)?;
            if fte_value.is_sign_negative() {
                return Err(reader.error(fte, "FTE must not be negative"));
            }

            Ok(StaffRecord {
                staff_id: normalize_identifier(reader.text(staff_id)?),
                rank: reader.text(rank)?.to_string(),
                section: reader.optional_text(section).to_string(),
                staff_category: reader.text(category)?.to_string(),
                fte: fte_value,
                default_cost_centre_code: normalize_cost_centre_code(
                    reader.text(default_cc)?,
                    code_width,
                ),
            })
        })
        .collect()
}

/// Reads the allocation extract. Percentages are converted from the
/// 0–100 scale to fractions.
pub fn read_extract(
    table: &SourceTable,
    columns: &ExtractColumns,
    code_width: usize,
) -> EngineResult<Vec<AllocationExtractRecord>> {
    let idx = require_columns(table, &columns.required())?;
    let (staff_id, rank, code, label, percentage) = (idx[0], idx[1], idx[2], idx[3], idx[4]);
    let hundred = Decimal::ONE_HUNDRED;

    table
        .rows()
        .iter()
        .map(|row| {
            let reader = RowReader::new(table, row);
            Ok(AllocationExtractRecord {
                staff_id: normalize_identifier(reader.text(staff_id)?),
                rank: reader.text(rank)?.to_string(),
                cost_centre_code: normalize_cost_centre_code(reader.text(code)?, code_width),
                cost_centre_label: reader.optional_text(label).to_string(),
                allocated_percentage: reader.decimal(percentage)? / hundred,
            })
        })
        .collect()
}

/// Reads the cost centre reference table.
///
/// A row is enabled when its flag equals `enabled_value` exactly (after
/// trimming); any other value, including an empty one, disables it.
pub fn read_cost_centres(
    table: &SourceTable,
    columns: &CostCentreColumns,
    code_width: usize,
    enabled_value: &str,
) -> EngineResult<CostCentreDirectory> {
    let idx = require_columns(table, &columns.required())?;
    let (code, description, flag) = (idx[0], idx[1], idx[2]);

    let entries = table
        .rows()
        .iter()
        .map(|row| {
            let reader = RowReader::new(table, row);
            Ok(CostCentreInfo {
                code: normalize_cost_centre_code(reader.text(code)?, code_width),
                description: reader.optional_text(description).to_string(),
                enabled: reader.optional_text(flag) == enabled_value,
            })
        })
        .collect::<EngineResult<Vec<_>>>()?;

    Ok(CostCentreDirectory::new(entries))
}

/// Reads the category order table into `(category, weight)` pairs.
pub fn read_category_weights(
    table: &SourceTable,
    columns: &CategoryOrderColumns,
) -> EngineResult<Vec<(String, Decimal)>> {
    let idx = require_columns(table, &columns.required())?;
    let (category, order) = (idx[0], idx[1]);

    table
        .rows()
        .iter()
        .map(|row| {
            let reader = RowReader::new(table, row);
            Ok((reader.text(category)?.to_string(), reader.decimal(order)?))
        })
        .collect()
}
