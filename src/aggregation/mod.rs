//! Multi-period aggregation.
//!
//! Pivots per-period fact tables into ordered [`AggregateTable`]s. All
//! views select their periods through a [`PeriodWindow`] and share one
//! category order reduced across the selected periods.
//!
//! [`AggregateTable`]: crate::models::AggregateTable
//! [`PeriodWindow`]: crate::models::PeriodWindow

mod category_union;
mod cost_centre;
mod trend;

pub use category_union::{CategoryOrderConflict, CategoryUnion, reduce_category_order};
pub use cost_centre::{RANK_COLUMN, cost_centre_breakdown};
pub use trend::{CATEGORY_COLUMN, fte_trend, headcount_trend};
