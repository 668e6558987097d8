//! Aggregate table models.
//!
//! An [`AggregateTable`] is the engine's reporting output: category rows in
//! rank order with one value column per period, followed by a Total row.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Period;
use crate::error::{EngineError, EngineResult};

/// How fact rows are combined into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateMode {
    /// Sum of allocations (FTE trend).
    Sum,
    /// Distinct staff count (headcount trend).
    Count,
}

/// Whether a row carries category data or the column totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// A category (and optionally rank) row.
    Category,
    /// The trailing column-wise total.
    Total,
}

/// One row of an [`AggregateTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    /// Category row or Total row.
    pub kind: RowKind,
    /// Category label, `"Total"` for the Total row.
    pub staff_category: String,
    /// Rank label for breakdown views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    /// One cell per period; `None` means the category had no data that period.
    pub values: Vec<Option<Decimal>>,
}

/// Ordered multi-period summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTable {
    /// How the cells were computed.
    pub mode: AggregateMode,
    /// Names of the leading label columns.
    pub label_columns: Vec<String>,
    /// The value columns, in chronological order.
    pub periods: Vec<Period>,
    /// Category rows in rank order, then the Total row.
    pub rows: Vec<AggregateRow>,
}

/// Label used for the Total row.
pub const TOTAL_LABEL: &str = "Total";

/// Source name used when an aggregate cell cannot be computed.
const FACTS_SOURCE: &str = "facts";

/// Adds `amount` to a cell, starting an empty cell at zero.
///
/// # Errors
///
/// `SourceDataInvalid` if the sum leaves the decimal range.
pub fn accumulate(cell: &mut Option<Decimal>, amount: Decimal, period: Period) -> EngineResult<()> {
    let sum = cell
        .unwrap_or_default()
        .checked_add(amount)
        .ok_or_else(|| overflow(period))?;
    *cell = Some(sum);
    Ok(())
}

fn overflow(period: Period) -> EngineError {
    EngineError::data_invalid(FACTS_SOURCE, format!("period {}: aggregate value overflows", period))
}

impl AggregateTable {
    /// Builds a table from category rows and appends the Total row.
    ///
    /// Missing cells count as zero in the total.
    ///
    /// # Errors
    ///
    /// `SourceDataInvalid` if a column total leaves the decimal range.
    pub fn with_total(
        mode: AggregateMode,
        label_columns: Vec<String>,
        periods: Vec<Period>,
        mut rows: Vec<AggregateRow>,
    ) -> EngineResult<Self> {
        let mut totals: Vec<Option<Decimal>> = vec![Some(Decimal::ZERO); periods.len()];
        for (column, period) in periods.iter().enumerate() {
            for value in rows.iter().filter_map(|row| row.values.get(column).copied().flatten()) {
                accumulate(&mut totals[column], value, *period)?;
            }
        }

        let has_rank = label_columns.len() > 1;
        rows.push(AggregateRow {
            kind: RowKind::Total,
            staff_category: TOTAL_LABEL.to_string(),
            rank: has_rank.then(String::new),
            values: totals,
        });

        Ok(Self {
            mode,
            label_columns,
            periods,
            rows,
        })
    }

    /// Rows other than the Total row.
    pub fn category_rows(&self) -> impl Iterator<Item = &AggregateRow> {
        self.rows.iter().filter(|row| row.kind == RowKind::Category)
    }

    /// The Total row.
    pub fn total_row(&self) -> Option<&AggregateRow> {
        self.rows.iter().rfind(|row| row.kind == RowKind::Total)
    }

    /// The cell for a category row and period, if both exist.
    pub fn value(&self, staff_category: &str, period: Period) -> Option<Decimal> {
        let column = self.periods.iter().position(|p| *p == period)?;
        self.category_rows()
            .find(|row| row.staff_category == staff_category)
            .and_then(|row| row.values.get(column).copied().flatten())
    }

    /// Label cells for display.
    ///
    /// A category label repeated from the previous category row is blanked,
    /// so breakdown views read as grouped blocks.
    pub fn display_labels(&self, index: usize) -> Vec<String> {
        let Some(row) = self.rows.get(index) else {
            return Vec::new();
        };

        let repeated = row.kind == RowKind::Category
            && index > 0
            && self.rows[index - 1].kind == RowKind::Category
            && self.rows[index - 1].staff_category == row.staff_category;

        let mut labels = vec![if repeated {
            String::new()
        } else {
            row.staff_category.clone()
        }];
        if self.label_columns.len() > 1 {
            labels.push(row.rank.clone().unwrap_or_default());
        }
        labels
    }

    /// Returns a copy with every cell rounded to `decimal_places`.
    pub fn rounded(&self, decimal_places: u32) -> Self {
        let mut table = self.clone();
        for row in &mut table.rows {
            for value in row.values.iter_mut().flatten() {
                *value = value.round_dp(decimal_places);
            }
        }
        table
    }
}

/// FTE breakdown for one cost centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCentreBreakdown {
    /// Cost centre description.
    pub cost_centre_name: String,
    /// Zero-padded cost centre code.
    pub cost_centre_code: String,
    /// Rows keyed by category and rank.
    pub table: AggregateTable,
}
