//! FTE by cost centre, category and rank.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use super::category_union::reduce_category_order;
use super::trend::CATEGORY_COLUMN;
use crate::error::EngineResult;
use crate::models::{
    AggregateMode, AggregateRow, AggregateTable, AllocationFact, CostCentreBreakdown, Period,
    PeriodWindow, RowKind, accumulate,
};

/// Second label column of breakdown tables.
pub const RANK_COLUMN: &str = "Rank";

type RowKey<'a> = (u32, &'a str, &'a str);

/// One FTE table per cost centre, sorted by cost centre name.
///
/// Rows are keyed by (category, rank) and ordered by the category order
/// reduced across the selected periods, then by rank label. The code shown
/// for a cost centre is the one from the latest period it appears in.
///
/// # Errors
///
/// `NoPeriodsAvailable` if no period of `window` has facts, and
/// `SourceDataInvalid` if a sum leaves the decimal range.
pub fn cost_centre_breakdown(
    periods: &BTreeMap<Period, Vec<AllocationFact>>,
    window: &PeriodWindow,
) -> EngineResult<Vec<CostCentreBreakdown>> {
    let selected = window.select(periods.keys())?;
    let union = reduce_category_order(periods, &selected);
    let columns = selected.len();

    let mut codes: BTreeMap<&str, &str> = BTreeMap::new();
    let mut cells: BTreeMap<&str, BTreeMap<RowKey<'_>, Vec<Option<Decimal>>>> = BTreeMap::new();

    for (column, period) in selected.iter().enumerate() {
        let facts = periods.get(period).map(Vec::as_slice).unwrap_or_default();
        for fact in facts {
            codes.insert(fact.cost_centre_name.as_str(), fact.cost_centre_code.as_str());

            let key = (
                union.order.rank(&fact.staff_category).unwrap_or(u32::MAX),
                fact.staff_category.as_str(),
                fact.rank.as_str(),
            );
            let row = cells
                .entry(fact.cost_centre_name.as_str())
                .or_default()
                .entry(key)
                .or_insert_with(|| vec![None; columns]);
            accumulate(&mut row[column], fact.allocation, *period)?;
        }
    }

    debug!(
        periods = columns,
        cost_centres = cells.len(),
        "Built cost centre breakdown"
    );

    let label_columns = vec![CATEGORY_COLUMN.to_string(), RANK_COLUMN.to_string()];
    cells
        .into_iter()
        .map(|(name, rows)| {
            let rows = rows
                .into_iter()
                .map(|((_, category, rank), values)| AggregateRow {
                    kind: RowKind::Category,
                    staff_category: category.to_string(),
                    rank: Some(rank.to_string()),
                    values,
                })
                .collect();

            Ok(CostCentreBreakdown {
                cost_centre_name: name.to_string(),
                cost_centre_code: codes.get(name).map(|c| c.to_string()).unwrap_or_default(),
                table: AggregateTable::with_total(
                    AggregateMode::Sum,
                    label_columns.clone(),
                    selected.clone(),
                    rows,
                )?,
            })
        })
        .collect()
}
