//! Category order resolution for a single period.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::CategoryOrderColumns;
use crate::error::EngineResult;
use crate::models::{AuditStep, CategoryOrder, StaffRecord};
use crate::source::{SourceTable, read_category_weights, require_columns};

/// Where a period's category order came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    /// An explicit category order table.
    Explicit,
    /// Lexicographic order of the roster's categories.
    Roster,
}

/// The resolved order, its source and the audit step.
#[derive(Debug, Clone)]
pub struct CategoryOrderResolution {
    /// The dense category ranks.
    pub order: CategoryOrder,
    /// Where the ranks came from.
    pub source: OrderSource,
    /// The `(category, order)` observations the ranks were derived from.
    pub weights: Vec<(String, Decimal)>,
    /// Blank rows dropped from the explicit table.
    pub rows_removed: usize,
    /// The audit step recording this stage.
    pub audit_step: AuditStep,
}

/// Resolves the category order for one period.
///
/// With an explicit table, blank rows are dropped and every remaining
/// `(category, order)` pair is ranked by order then label. Without one,
/// the roster's distinct categories are ranked lexicographically.
///
/// # Errors
///
/// Returns `SourceSchemaInvalid` if the explicit table lacks its columns and
/// `SourceDataInvalid` if a row has an empty or non-numeric order.
pub fn resolve_category_order(
    roster: &[StaffRecord],
    explicit: Option<&SourceTable>,
    columns: &CategoryOrderColumns,
    step_number: u32,
) -> EngineResult<CategoryOrderResolution> {
    let (source, weights, rows_removed) = match explicit {
        Some(table) => {
            let mut table = table.clone();
            let required = require_columns(&table, &columns.required())?;
            let rows_removed = table.drop_blank_rows_in(&required);
            (OrderSource::Explicit, read_category_weights(&table, columns)?, rows_removed)
        }
        None => {
            let weights = roster
                .iter()
                .map(|staff| (staff.staff_category.clone(), Decimal::ZERO))
                .collect();
            (OrderSource::Roster, weights, 0)
        }
    };

    let order = CategoryOrder::from_weighted(weights.iter().cloned());
    let labels = order.labels_in_order();

    let audit_step = AuditStep {
        step_number,
        rule_id: "category_order".to_string(),
        rule_name: "Category Order Resolution".to_string(),
        input: serde_json::json!({
            "source": source,
            "observations": weights.len()
        }),
        output: serde_json::json!({
            "categories": labels
        }),
        reasoning: match source {
            OrderSource::Explicit => format!(
                "{} categories ranked by explicit order, ties broken by label",
                labels.len()
            ),
            OrderSource::Roster => format!(
                "No order table supplied; {} roster categories ranked alphabetically",
                labels.len()
            ),
        },
    };

    Ok(CategoryOrderResolution {
        order,
        source,
        weights,
        rows_removed,
        audit_step,
    })
}
