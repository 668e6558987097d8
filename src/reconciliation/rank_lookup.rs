//! Rank to staff category lookup.
//!
//! The roster is the only place that says which category a rank belongs
//! to. Extract rows carry a rank but no category, so every extract-derived
//! fact goes through this lookup.

use std::collections::BTreeMap;

use tracing::warn;

use crate::models::{AuditStep, RankConflict, StaffRecord};

/// Maps rank labels to staff category labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankCategoryLookup {
    categories: BTreeMap<String, String>,
}

impl RankCategoryLookup {
    /// The category for `rank`, if the roster has one.
    pub fn category(&self, rank: &str) -> Option<&str> {
        self.categories.get(rank).map(String::as_str)
    }

    /// Number of distinct ranks.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns true if the roster had no ranks.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// The lookup together with any conflicts found and the audit step.
#[derive(Debug, Clone)]
pub struct RankLookupResult {
    /// The resolved lookup.
    pub lookup: RankCategoryLookup,
    /// Ranks the roster assigns to more than one category.
    pub conflicts: Vec<RankConflict>,
    /// The audit step recording this stage.
    pub audit_step: AuditStep,
}

/// Builds the rank lookup from roster records.
///
/// When a rank appears with different categories the last roster row wins.
/// Every such rank is returned as a [`RankConflict`] and logged.
///
/// # Example
///
/// ```
/// use allocation_engine::models::StaffRecord;
/// use allocation_engine::reconciliation::build_rank_lookup;
/// use rust_decimal::Decimal;
///
/// let staff = |id: &str, rank: &str, category: &str| StaffRecord {
///     staff_id: id.to_string(),
///     rank: rank.to_string(),
///     section: String::new(),
///     staff_category: category.to_string(),
///     fte: Decimal::ONE,
///     default_cost_centre_code: "001".to_string(),
/// };
///
/// let result = build_rank_lookup(&[staff("1", "R1", "Senior"), staff("2", "R1", "Junior")], 1);
/// assert_eq!(result.lookup.category("R1"), Some("Junior"));
/// assert_eq!(result.conflicts.len(), 1);
/// ```
pub fn build_rank_lookup(roster: &[StaffRecord], step_number: u32) -> RankLookupResult {
    let mut seen: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut categories = BTreeMap::new();

    for staff in roster {
        let observed = seen.entry(staff.rank.as_str()).or_default();
        if !observed.contains(&staff.staff_category.as_str()) {
            observed.push(staff.staff_category.as_str());
        }
        categories.insert(staff.rank.clone(), staff.staff_category.clone());
    }

    let conflicts: Vec<RankConflict> = seen
        .into_iter()
        .filter(|(_, observed)| observed.len() > 1)
        .map(|(rank, observed)| RankConflict {
            rank: rank.to_string(),
            categories: observed.iter().map(|c| c.to_string()).collect(),
            resolved: categories.get(rank).cloned().unwrap_or_default(),
        })
        .collect();

    for conflict in &conflicts {
        warn!(
            rank = %conflict.rank,
            categories = ?conflict.categories,
            resolved = %conflict.resolved,
            "Rank maps to more than one staff category"
        );
    }

    let reasoning = if conflicts.is_empty() {
        format!("{} rank(s) mapped to a single category each", categories.len())
    } else {
        format!(
            "{} rank(s) mapped; {} conflicting rank(s) resolved to the last roster row",
            categories.len(),
            conflicts.len()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "rank_category_lookup".to_string(),
        rule_name: "Rank to Category Lookup".to_string(),
        input: serde_json::json!({
            "roster_rows": roster.len()
        }),
        output: serde_json::json!({
            "ranks": categories.len(),
            "conflicting_ranks": conflicts.iter().map(|c| c.rank.as_str()).collect::<Vec<_>>()
        }),
        reasoning,
    };

    RankLookupResult {
        lookup: RankCategoryLookup { categories },
        conflicts,
        audit_step,
    }
}
