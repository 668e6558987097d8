//! Category order across periods.
//!
//! Each period's facts carry the category rank resolved for that period.
//! A multi-period report needs one order, so the observations of all
//! selected periods are collected first and resolved once: for every
//! category the observation from the latest period wins, then the result
//! is re-ranked densely by (order, label).

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{AllocationFact, CategoryOrder, Period};

/// A category whose rank differs between periods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOrderConflict {
    /// The category label.
    pub staff_category: String,
    /// The rank seen in each period that had the category, in period order.
    pub observed: Vec<(Period, u32)>,
}

/// The reduced order and any cross-period disagreements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryUnion {
    /// One dense order covering every category in the selected periods.
    pub order: CategoryOrder,
    /// Categories whose rank changed between periods.
    pub conflicts: Vec<CategoryOrderConflict>,
}

/// Reduces the per-period category ranks of `selected` into one order.
pub fn reduce_category_order(
    periods: &BTreeMap<Period, Vec<AllocationFact>>,
    selected: &[Period],
) -> CategoryUnion {
    let mut chronological = selected.to_vec();
    chronological.sort();

    let mut observations: BTreeMap<&str, Vec<(Period, u32)>> = BTreeMap::new();
    for period in &chronological {
        let Some(facts) = periods.get(period) else {
            continue;
        };
        for fact in facts {
            let seen = observations.entry(fact.staff_category.as_str()).or_default();
            match seen.last_mut() {
                Some((last_period, rank)) if last_period == period => *rank = fact.staff_category_order,
                _ => seen.push((*period, fact.staff_category_order)),
            }
        }
    }

    let conflicts: Vec<CategoryOrderConflict> = observations
        .iter()
        .filter(|(_, seen)| seen.windows(2).any(|pair| pair[0].1 != pair[1].1))
        .map(|(category, seen)| CategoryOrderConflict {
            staff_category: category.to_string(),
            observed: seen.clone(),
        })
        .collect();

    for conflict in &conflicts {
        debug!(
            staff_category = %conflict.staff_category,
            observed = ?conflict.observed,
            "Category rank differs between periods; latest period wins"
        );
    }

    let order = CategoryOrder::from_weighted(observations.iter().filter_map(|(category, seen)| {
        seen.last()
            .map(|(_, rank)| (category.to_string(), Decimal::from(*rank)))
    }));

    CategoryUnion { order, conflicts }
}
