//! The normalized allocation fact row.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One (staff, cost centre) row of the reconciled fact table.
///
/// For a given period, the facts of one staff member sum to that staff
/// member's roster FTE when the extract covers them fully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationFact {
    /// Staff identifier.
    pub staff_id: String,
    /// Rank the allocation was recorded under.
    pub rank: String,
    /// Reporting category resolved from the rank.
    pub staff_category: String,
    /// Dense 1-based sort rank of the category.
    pub staff_category_order: u32,
    /// Zero-padded cost centre code.
    pub cost_centre_code: String,
    /// Cost centre description from the reference table.
    pub cost_centre_name: String,
    /// FTE apportioned to this cost centre.
    pub allocation: Decimal,
}
