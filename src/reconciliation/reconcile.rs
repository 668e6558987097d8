//! Roster/allocation reconciliation for one period.
//!
//! Turns the four source tables of a period into [`AllocationFact`] rows:
//! one per extract row for staff on the roster, plus one default row for
//! every roster member the extract never mentions. Stages run in a fixed
//! order and each one appends an [`AuditStep`].

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AllocationFact, AuditStep, AuditTrace, AuditWarning, CostCentreLookup, ExcludedFact,
    IncompleteAllocation, Period, ReconciliationReport, ReconciliationResult, StaffRecord,
};
use crate::source::{
    SourceTable, SourceTables, missing_columns, read_cost_centres, read_extract, read_roster,
    require_columns,
};

use super::category_order::resolve_category_order;
use super::rank_lookup::build_rank_lookup;

/// Reconciles one period's source tables into allocation facts.
///
/// # Errors
///
/// * `SourceSchemaInvalid` if any table lacks a required column. Headers
///   of all tables are checked before any row is read.
/// * `SourceDataInvalid` for a duplicate roster staff id, an extract rank
///   with no roster category, a category missing from the category order,
///   a cost centre absent from the reference table, or a malformed cell.
///
/// Orphan extract rows, incomplete allocations, rank conflicts and
/// disabled cost centres are reported in the result, not returned as errors.
pub fn reconcile_period(
    period: Period,
    tables: &SourceTables,
    config: &EngineConfig,
) -> EngineResult<ReconciliationResult> {
    let start_time = Instant::now();
    let columns = &config.columns;
    let width = config.cost_centre_code_width;
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    debug!(period = %period, "Starting reconciliation");

    // Headers
    let mut checked = vec![
        (&tables.roster, columns.roster.required()),
        (&tables.extract, columns.extract.required()),
        (&tables.cost_centres, columns.cost_centre.required()),
    ];
    if let Some(order) = &tables.category_order {
        checked.push((order, columns.category_order.required()));
    }
    for (table, required) in &checked {
        let missing = missing_columns(table, required);
        if !missing.is_empty() {
            warn!(period = %period, table = table.name(), missing = ?missing, "Missing required columns");
            return Err(EngineError::SourceSchemaInvalid {
                source_name: table.name().to_string(),
                missing,
            });
        }
    }
    steps.push(AuditStep {
        step_number,
        rule_id: "header_validation".to_string(),
        rule_name: "Header Validation".to_string(),
        input: serde_json::json!({
            "tables": checked.iter().map(|(t, _)| t.name()).collect::<Vec<_>>()
        }),
        output: serde_json::json!({ "missing": [] }),
        reasoning: format!("All {} tables expose their required columns", checked.len()),
    });
    step_number += 1;

    // Cleaning
    let mut roster_table = tables.roster.clone();
    let mut extract_table = tables.extract.clone();
    let mut cost_centre_table = tables.cost_centres.clone();
    let roster_required = require_columns(&roster_table, &columns.roster.required())?;
    let extract_required = require_columns(&extract_table, &columns.extract.required())?;
    let cost_centre_required = require_columns(&cost_centre_table, &columns.cost_centre.required())?;
    let blank_rows = roster_table.drop_blank_rows_in(&roster_required)
        + extract_table.drop_blank_rows_in(&extract_required)
        + cost_centre_table.drop_blank_rows_in(&cost_centre_required);
    let roster_footer = drop_edge_row(&mut roster_table, &columns.roster.rank, Edge::Last);
    let extract_header = drop_edge_row(&mut extract_table, &columns.extract.rank, Edge::First);
    let mut empty_rows_removed = blank_rows + usize::from(roster_footer) + usize::from(extract_header);
    if empty_rows_removed > 0 {
        debug!(
            period = %period,
            rows_removed = empty_rows_removed,
            roster_footer,
            extract_header,
            "Dropped empty rows"
        );
    }
    steps.push(AuditStep {
        step_number,
        rule_id: "row_cleaning".to_string(),
        rule_name: "Empty Row Removal".to_string(),
        input: serde_json::json!({
            "roster_rows": tables.roster.len(),
            "extract_rows": tables.extract.len(),
            "cost_centre_rows": tables.cost_centres.len()
        }),
        output: serde_json::json!({
            "blank_rows_removed": blank_rows,
            "roster_footer_removed": roster_footer,
            "extract_leading_row_removed": extract_header
        }),
        reasoning: format!("{} empty or footer row(s) removed", empty_rows_removed),
    });
    step_number += 1;

    // Typed records and roster uniqueness
    let roster = read_roster(&roster_table, &columns.roster, width)?;
    let extract = read_extract(&extract_table, &columns.extract, width)?;

    let mut roster_index: BTreeMap<&str, &StaffRecord> = BTreeMap::new();
    for staff in &roster {
        if roster_index.insert(staff.staff_id.as_str(), staff).is_some() {
            warn!(period = %period, staff_id = %staff.staff_id, "Duplicate staff id in roster");
            return Err(EngineError::data_invalid(
                roster_table.name(),
                format!("staff id '{}' appears more than once", staff.staff_id),
            ));
        }
    }
    steps.push(AuditStep {
        step_number,
        rule_id: "roster_uniqueness".to_string(),
        rule_name: "Roster Uniqueness".to_string(),
        input: serde_json::json!({ "roster_rows": roster.len() }),
        output: serde_json::json!({ "unique_staff": roster_index.len() }),
        reasoning: format!("{} roster staff ids are unique", roster_index.len()),
    });
    step_number += 1;

    // Rank lookup
    let rank_result = build_rank_lookup(&roster, step_number);
    let rank_lookup = rank_result.lookup;
    let rank_conflicts = rank_result.conflicts;
    steps.push(rank_result.audit_step);
    step_number += 1;
    for conflict in &rank_conflicts {
        warnings.push(AuditWarning {
            code: "RANK_CATEGORY_CONFLICT".to_string(),
            message: format!(
                "Rank '{}' appears with categories {}; using '{}'",
                conflict.rank,
                conflict.categories.join(", "),
                conflict.resolved
            ),
            severity: "medium".to_string(),
        });
    }

    // Cost centres
    let directory = read_cost_centres(
        &cost_centre_table,
        &columns.cost_centre,
        width,
        &config.enabled_flag_value,
    )?;
    let disabled_cost_centres_removed = directory.disabled_rows();
    if disabled_cost_centres_removed > 0 {
        info!(
            period = %period,
            disabled = disabled_cost_centres_removed,
            "Disabled cost centres removed"
        );
    }
    steps.push(AuditStep {
        step_number,
        rule_id: "cost_centre_lookup".to_string(),
        rule_name: "Cost Centre Lookup".to_string(),
        input: serde_json::json!({ "cost_centre_rows": cost_centre_table.len() }),
        output: serde_json::json!({
            "enabled": directory.enabled_count(),
            "disabled_removed": disabled_cost_centres_removed
        }),
        reasoning: format!(
            "{} enabled cost centre(s), {} disabled removed",
            directory.enabled_count(),
            disabled_cost_centres_removed
        ),
    });
    step_number += 1;

    // Category order
    let resolution = resolve_category_order(
        &roster,
        tables.category_order.as_ref(),
        &columns.category_order,
        step_number,
    )?;
    empty_rows_removed += resolution.rows_removed;
    let category_order = resolution.order;
    steps.push(resolution.audit_step);
    step_number += 1;

    // Extract expansion
    let mut facts: Vec<AllocationFact> = Vec::with_capacity(extract.len() + roster.len());
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    let mut total_index: BTreeMap<String, usize> = BTreeMap::new();
    let mut orphans: BTreeSet<String> = BTreeSet::new();
    let mut claimed: HashSet<&str> = HashSet::new();
    let mut excluded_facts: Vec<ExcludedFact> = Vec::new();

    for (record, row) in extract.iter().zip(extract_table.rows()) {
        match total_index.get(&record.staff_id) {
            Some(&index) => {
                totals[index].1 = totals[index]
                    .1
                    .checked_add(record.allocated_percentage)
                    .ok_or_else(|| overflows(extract_table.name(), row.number, "percentage total"))?;
            }
            None => {
                total_index.insert(record.staff_id.clone(), totals.len());
                totals.push((record.staff_id.clone(), record.allocated_percentage));
            }
        }

        let Some(staff) = roster_index.get(record.staff_id.as_str()) else {
            if orphans.insert(record.staff_id.clone()) {
                debug!(period = %period, staff_id = %record.staff_id, "Extract staff not on roster");
            }
            continue;
        };

        let category = rank_lookup.category(&record.rank).ok_or_else(|| {
            EngineError::data_invalid(
                extract_table.name(),
                format!(
                    "rank '{}' of staff '{}' has no staff category on the roster",
                    record.rank, record.staff_id
                ),
            )
        })?;
        let category_rank = category_order.rank(category).ok_or_else(|| {
            EngineError::data_invalid(
                extract_table.name(),
                format!("staff category '{}' has no category order", category),
            )
        })?;

        let allocation = record
            .allocated_percentage
            .checked_mul(staff.fte)
            .ok_or_else(|| overflows(extract_table.name(), row.number, "allocation"))?;
        match directory.lookup(&record.cost_centre_code) {
            CostCentreLookup::Enabled(name) => facts.push(AllocationFact {
                staff_id: record.staff_id.clone(),
                rank: record.rank.clone(),
                staff_category: category.to_string(),
                staff_category_order: category_rank,
                cost_centre_code: record.cost_centre_code.clone(),
                cost_centre_name: name.to_string(),
                allocation,
            }),
            CostCentreLookup::Disabled => excluded_facts.push(ExcludedFact {
                staff_id: record.staff_id.clone(),
                cost_centre_code: record.cost_centre_code.clone(),
                allocation,
            }),
            CostCentreLookup::Unknown => {
                return Err(unknown_cost_centre(
                    extract_table.name(),
                    &record.cost_centre_code,
                    &record.staff_id,
                ));
            }
        }

        claimed.insert(staff.staff_id.as_str());
    }
    let extract_facts = facts.len();
    steps.push(AuditStep {
        step_number,
        rule_id: "extract_expansion".to_string(),
        rule_name: "Extract Allocation Expansion".to_string(),
        input: serde_json::json!({ "extract_rows": extract.len() }),
        output: serde_json::json!({
            "facts": extract_facts,
            "orphans": orphans.len(),
            "excluded": excluded_facts.len()
        }),
        reasoning: format!(
            "{} extract row(s) apportioned by roster FTE; {} orphan staff skipped",
            extract_facts,
            orphans.len()
        ),
    });
    step_number += 1;

    // Roster defaults
    for staff in roster.iter().filter(|s| !claimed.contains(s.staff_id.as_str())) {
        let category_rank = category_order.rank(&staff.staff_category).ok_or_else(|| {
            EngineError::data_invalid(
                roster_table.name(),
                format!("staff category '{}' has no category order", staff.staff_category),
            )
        })?;

        match directory.lookup(&staff.default_cost_centre_code) {
            CostCentreLookup::Enabled(name) => facts.push(AllocationFact {
                staff_id: staff.staff_id.clone(),
                rank: staff.rank.clone(),
                staff_category: staff.staff_category.clone(),
                staff_category_order: category_rank,
                cost_centre_code: staff.default_cost_centre_code.clone(),
                cost_centre_name: name.to_string(),
                allocation: staff.fte,
            }),
            CostCentreLookup::Disabled => excluded_facts.push(ExcludedFact {
                staff_id: staff.staff_id.clone(),
                cost_centre_code: staff.default_cost_centre_code.clone(),
                allocation: staff.fte,
            }),
            CostCentreLookup::Unknown => {
                return Err(unknown_cost_centre(
                    roster_table.name(),
                    &staff.default_cost_centre_code,
                    &staff.staff_id,
                ));
            }
        }
    }
    let default_facts = facts.len() - extract_facts;
    steps.push(AuditStep {
        step_number,
        rule_id: "roster_defaults".to_string(),
        rule_name: "Roster Default Allocation".to_string(),
        input: serde_json::json!({
            "roster_staff": roster.len(),
            "claimed_staff": claimed.len()
        }),
        output: serde_json::json!({ "facts": default_facts }),
        reasoning: format!(
            "{} unclaimed staff allocated in full to their default cost centre",
            roster.len() - claimed.len()
        ),
    });
    step_number += 1;

    // Completeness
    let incomplete_allocations: Vec<IncompleteAllocation> = totals
        .into_iter()
        .filter(|(_, total)| {
            total
                .checked_sub(Decimal::ONE)
                .is_none_or(|gap| gap.abs() > config.allocation_tolerance)
        })
        .map(|(staff_id, observed_total)| IncompleteAllocation {
            staff_id,
            observed_total,
        })
        .collect();
    steps.push(AuditStep {
        step_number,
        rule_id: "allocation_completeness".to_string(),
        rule_name: "Allocation Completeness".to_string(),
        input: serde_json::json!({
            "staff_in_extract": total_index.len(),
            "tolerance": config.allocation_tolerance.to_string()
        }),
        output: serde_json::json!({
            "incomplete": incomplete_allocations.iter().map(ToString::to_string).collect::<Vec<_>>()
        }),
        reasoning: format!(
            "{} staff with extract percentages not summing to 100%",
            incomplete_allocations.len()
        ),
    });

    if !orphans.is_empty() {
        warn!(period = %period, count = orphans.len(), orphans = ?orphans, "Extract staff not on roster");
        warnings.push(AuditWarning {
            code: "ORPHAN_EXTRACT_STAFF".to_string(),
            message: format!(
                "{} extract staff not on the roster: {}",
                orphans.len(),
                orphans.iter().cloned().collect::<Vec<_>>().join(", ")
            ),
            severity: "low".to_string(),
        });
    }
    for incomplete in &incomplete_allocations {
        warn!(
            period = %period,
            staff_id = %incomplete.staff_id,
            observed_total = %incomplete.observed_total,
            "Incomplete allocation"
        );
        warnings.push(AuditWarning {
            code: "INCOMPLETE_ALLOCATION".to_string(),
            message: format!(
                "Allocation percentages for staff {} sum to {}",
                incomplete.staff_id,
                incomplete.observed_total.normalize()
            ),
            severity: "medium".to_string(),
        });
    }
    if !excluded_facts.is_empty() {
        warnings.push(AuditWarning {
            code: "DISABLED_COST_CENTRE".to_string(),
            message: format!(
                "{} allocation(s) to disabled cost centres excluded",
                excluded_facts.len()
            ),
            severity: "low".to_string(),
        });
    }

    let duration_us = start_time.elapsed().as_micros() as u64;
    info!(
        period = %period,
        facts = facts.len(),
        orphans = orphans.len(),
        incomplete = incomplete_allocations.len(),
        duration_us,
        "Reconciliation completed"
    );

    Ok(ReconciliationResult {
        run_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        period,
        facts,
        report: ReconciliationReport {
            orphan_staff_ids: orphans.into_iter().collect(),
            incomplete_allocations,
            rank_conflicts,
            disabled_cost_centres_removed,
            excluded_facts,
            empty_rows_removed,
        },
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us,
        },
    })
}

enum Edge {
    First,
    Last,
}

fn drop_edge_row(table: &mut SourceTable, rank_column: &str, edge: Edge) -> bool {
    let Some(column) = table.column_index(rank_column) else {
        return false;
    };
    match edge {
        Edge::First => table.drop_leading_row_if_empty(column),
        Edge::Last => table.drop_trailing_row_if_empty(column),
    }
}

fn overflows(source_name: &str, row: usize, what: &str) -> EngineError {
    EngineError::data_invalid(source_name, format!("row {}: {} overflows", row, what))
}

fn unknown_cost_centre(source_name: &str, code: &str, staff_id: &str) -> EngineError {
    EngineError::data_invalid(
        source_name,
        format!(
            "cost centre '{}' of staff '{}' is not in the cost centre table",
            code, staff_id
        ),
    )
}
