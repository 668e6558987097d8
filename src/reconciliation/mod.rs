//! Reconciliation of roster and allocation extract.
//!
//! This module contains the per-period pipeline: the category order
//! resolver, the rank to category lookup and the reconciler that ties them
//! together into allocation facts.

mod category_order;
mod rank_lookup;
mod reconcile;

pub use category_order::{CategoryOrderResolution, OrderSource, resolve_category_order};
pub use rank_lookup::{RankCategoryLookup, RankLookupResult, build_rank_lookup};
pub use reconcile::reconcile_period;
