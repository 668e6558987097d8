//! Category trend pivots.
//!
//! One row per staff category, one column per selected period. FTE trends
//! sum allocations; headcount trends count each staff member once per
//! period no matter how many cost centres they are split across.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use tracing::debug;

use super::category_union::reduce_category_order;
use crate::error::EngineResult;
use crate::models::{
    AggregateMode, AggregateRow, AggregateTable, AllocationFact, Period, PeriodWindow, RowKind,
    accumulate,
};

/// Label column of category trend tables.
pub const CATEGORY_COLUMN: &str = "Staff Category";

/// Total allocated FTE per staff category and period.
///
/// # Errors
///
/// `NoPeriodsAvailable` if no period of `window` has facts, and
/// `SourceDataInvalid` if a sum leaves the decimal range.
pub fn fte_trend(
    periods: &BTreeMap<Period, Vec<AllocationFact>>,
    window: &PeriodWindow,
) -> EngineResult<AggregateTable> {
    category_trend(periods, window, AggregateMode::Sum)
}

/// Distinct staff per staff category and period.
///
/// A staff member's first fact row in a period decides which category
/// they are counted under.
///
/// # Errors
///
/// `NoPeriodsAvailable` if no period of `window` has facts.
pub fn headcount_trend(
    periods: &BTreeMap<Period, Vec<AllocationFact>>,
    window: &PeriodWindow,
) -> EngineResult<AggregateTable> {
    category_trend(periods, window, AggregateMode::Count)
}

fn category_trend(
    periods: &BTreeMap<Period, Vec<AllocationFact>>,
    window: &PeriodWindow,
    mode: AggregateMode,
) -> EngineResult<AggregateTable> {
    let selected = window.select(periods.keys())?;
    let union = reduce_category_order(periods, &selected);
    let columns = selected.len();

    let mut cells: BTreeMap<&str, Vec<Option<Decimal>>> = BTreeMap::new();
    for (column, period) in selected.iter().enumerate() {
        let facts = periods.get(period).map(Vec::as_slice).unwrap_or_default();
        let mut counted: HashSet<&str> = HashSet::new();

        for fact in facts {
            let amount = match mode {
                AggregateMode::Sum => fact.allocation,
                AggregateMode::Count => {
                    if !counted.insert(fact.staff_id.as_str()) {
                        continue;
                    }
                    Decimal::ONE
                }
            };
            let row = cells
                .entry(fact.staff_category.as_str())
                .or_insert_with(|| vec![None; columns]);
            accumulate(&mut row[column], amount, *period)?;
        }
    }

    let mut rows: Vec<(u32, &str, Vec<Option<Decimal>>)> = cells
        .into_iter()
        .map(|(category, values)| {
            let rank = union.order.rank(category).unwrap_or(u32::MAX);
            (rank, category, values)
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    debug!(
        mode = ?mode,
        periods = columns,
        categories = rows.len(),
        "Built category trend"
    );

    AggregateTable::with_total(
        mode,
        vec![CATEGORY_COLUMN.to_string()],
        selected,
        rows.into_iter()
            .map(|(_, category, values)| AggregateRow {
                kind: RowKind::Category,
                staff_category: category.to_string(),
                rank: None,
                values,
            })
            .collect(),
    )
}
