//! Roster and allocation extract records.
//!
//! These are the typed forms of the two personnel sources. Both are
//! produced by [`crate::source`] after header validation and cleaning.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A staff member as listed on the roster.
///
/// `staff_id` is unique within one roster snapshot.
///
/// # Example
///
/// ```
/// use allocation_engine::models::StaffRecord;
/// use rust_decimal::Decimal;
///
/// let staff = StaffRecord {
///     staff_id: "1001".to_string(),
///     rank: "Professor".to_string(),
///     section: "Engineering".to_string(),
///     staff_category: "Academic".to_string(),
///     fte: Decimal::ONE,
///     default_cost_centre_code: "001".to_string(),
/// };
/// assert!(staff.is_full_time());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    /// Staff identifier.
    pub staff_id: String,
    /// Fine-grained title.
    pub rank: String,
    /// Organisational section.
    pub section: String,
    /// Reporting category the rank belongs to.
    pub staff_category: String,
    /// Full-time equivalent, usually between 0 and 1.
    pub fte: Decimal,
    /// Zero-padded cost centre used when the extract has no rows for this staff.
    pub default_cost_centre_code: String,
}

impl StaffRecord {
    /// Returns true if the staff member is on a full FTE.
    pub fn is_full_time(&self) -> bool {
        self.fte == Decimal::ONE
    }
}

/// One row of the percentage allocation extract.
///
/// A staff member may appear on several rows, one per cost centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationExtractRecord {
    /// Staff identifier, not unique in the extract.
    pub staff_id: String,
    /// Rank as recorded on the extract.
    pub rank: String,
    /// Zero-padded cost centre code.
    pub cost_centre_code: String,
    /// Cost centre label as printed on the extract.
    pub cost_centre_label: String,
    /// Share of the staff member's FTE, already divided by 100.
    pub allocated_percentage: Decimal,
}
