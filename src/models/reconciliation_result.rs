//! Reconciliation result models.
//!
//! This module contains the [`ReconciliationResult`] type and its associated
//! structures that capture all outputs of reconciling one period: the fact
//! rows, the soft-anomaly report, and an audit trace.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AllocationFact, Period};

/// A staff member whose extract percentages do not add up to 100%.
///
/// # Example
///
/// ```
/// use allocation_engine::models::IncompleteAllocation;
/// use rust_decimal::Decimal;
///
/// let incomplete = IncompleteAllocation {
///     staff_id: "1".to_string(),
///     observed_total: Decimal::new(9, 1),
/// };
/// assert_eq!(incomplete.to_string(), "1(0.9)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteAllocation {
    /// The staff identifier.
    pub staff_id: String,
    /// Sum of the staff member's extract percentages, on the 0–1 scale.
    pub observed_total: Decimal,
}

impl fmt::Display for IncompleteAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.staff_id, self.observed_total.normalize())
    }
}

/// A rank that the roster assigns to more than one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankConflict {
    /// The rank label.
    pub rank: String,
    /// Every category seen for the rank, in roster order.
    pub categories: Vec<String>,
    /// The category that was used (the last one seen).
    pub resolved: String,
}

/// A fact row dropped because its cost centre is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedFact {
    /// The staff identifier.
    pub staff_id: String,
    /// The disabled cost centre code.
    pub cost_centre_code: String,
    /// The allocation that was dropped.
    pub allocation: Decimal,
}

/// Informational anomalies found while reconciling a period.
///
/// None of these stop reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Staff on the extract but not on the roster, sorted ascending.
    pub orphan_staff_ids: Vec<String>,
    /// Staff whose extract percentages differ from 100%, in first-seen order.
    pub incomplete_allocations: Vec<IncompleteAllocation>,
    /// Ranks mapped to more than one category on the roster.
    pub rank_conflicts: Vec<RankConflict>,
    /// Disabled rows removed from the cost centre reference table.
    pub disabled_cost_centres_removed: usize,
    /// Fact rows dropped because they point at a disabled cost centre.
    pub excluded_facts: Vec<ExcludedFact>,
    /// Blank and footer rows dropped across all source tables.
    pub empty_rows_removed: usize,
}

impl ReconciliationReport {
    /// Returns true if nothing was reported.
    pub fn is_clean(&self) -> bool {
        self.orphan_staff_ids.is_empty()
            && self.incomplete_allocations.is_empty()
            && self.rank_conflicts.is_empty()
            && self.excluded_facts.is_empty()
    }

    /// Incomplete allocations rendered as `id(total)` strings.
    pub fn incomplete_allocation_labels(&self) -> Vec<String> {
        self.incomplete_allocations
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

/// A single step in the audit trace recording a reconciliation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the stage.
    pub rule_id: String,
    /// The human-readable name of the stage.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the outcome.
    pub reasoning: String,
}

/// A warning generated during reconciliation.
///
/// Warnings indicate anomalies that don't prevent reconciliation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of reconciliation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during reconciliation.
    pub warnings: Vec<AuditWarning>,
    /// The total reconciliation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of reconciling one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the reconciliation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the reconciliation.
    pub engine_version: String,
    /// The period the facts belong to.
    pub period: Period,
    /// The reconciled fact rows, extract-derived rows first, then roster defaults.
    pub facts: Vec<AllocationFact>,
    /// Soft anomalies found on the way.
    pub report: ReconciliationReport,
    /// Audit trace of reconciliation stages.
    pub audit_trace: AuditTrace,
}

impl ReconciliationResult {
    /// Sum of all fact allocations, or `None` if it leaves the decimal range.
    pub fn total_allocation(&self) -> Option<Decimal> {
        self.facts
            .iter()
            .try_fold(Decimal::ZERO, |sum, fact| sum.checked_add(fact.allocation))
    }
}
