//! Configuration types for the allocation engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `engine.yaml`. Every field has a default, so a
//! partial file only overrides what it names.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Column names of the roster table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RosterColumns {
    /// Staff identifier column.
    pub staff_id: String,
    /// Rank column.
    pub rank: String,
    /// Section column.
    pub section: String,
    /// Staff category column.
    pub staff_category: String,
    /// FTE column.
    pub fte: String,
    /// Default cost centre column.
    pub default_cost_centre: String,
}

impl Default for RosterColumns {
    fn default() -> Self {
        Self {
            staff_id: "StaffNo".to_string(),
            rank: "Rank".to_string(),
            section: "Section".to_string(),
            staff_category: "Staff Category".to_string(),
            fte: "FTE".to_string(),
            default_cost_centre: "Default Cost Centre".to_string(),
        }
    }
}

impl RosterColumns {
    /// The required columns, in declaration order.
    pub fn required(&self) -> Vec<&str> {
        vec![
            self.staff_id.as_str(),
            self.rank.as_str(),
            self.section.as_str(),
            self.staff_category.as_str(),
            self.fte.as_str(),
            self.default_cost_centre.as_str(),
        ]
    }
}

/// Column names of the allocation extract table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractColumns {
    /// Staff identifier column.
    pub staff_id: String,
    /// Rank column.
    pub rank: String,
    /// Cost centre code column.
    pub cost_centre_code: String,
    /// Cost centre label column.
    pub cost_centre_label: String,
    /// Allocated percentage column, on a 0–100 scale.
    pub allocated_percentage: String,
}

impl Default for ExtractColumns {
    fn default() -> Self {
        Self {
            staff_id: "StaffNo".to_string(),
            rank: "Rank".to_string(),
            cost_centre_code: "CCode".to_string(),
            cost_centre_label: "CostCentre".to_string(),
            allocated_percentage: "Allocated Percentage".to_string(),
        }
    }
}

impl ExtractColumns {
    /// The required columns, in declaration order.
    pub fn required(&self) -> Vec<&str> {
        vec![
            self.staff_id.as_str(),
            self.rank.as_str(),
            self.cost_centre_code.as_str(),
            self.cost_centre_label.as_str(),
            self.allocated_percentage.as_str(),
        ]
    }
}

/// Column names of the cost centre reference table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CostCentreColumns {
    /// Code column.
    pub code: String,
    /// Description column.
    pub description: String,
    /// Enabled flag column.
    pub enabled_flag: String,
}

impl Default for CostCentreColumns {
    fn default() -> Self {
        Self {
            code: "Value".to_string(),
            description: "Description".to_string(),
            enabled_flag: "Enabled/ Disabled".to_string(),
        }
    }
}

impl CostCentreColumns {
    /// The required columns, in declaration order.
    pub fn required(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.description.as_str(), self.enabled_flag.as_str()]
    }
}

/// Column names of the optional category order table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CategoryOrderColumns {
    /// Staff category column.
    pub staff_category: String,
    /// Order column.
    pub order: String,
}

impl Default for CategoryOrderColumns {
    fn default() -> Self {
        Self {
            staff_category: "Staff Category".to_string(),
            order: "Order".to_string(),
        }
    }
}

impl CategoryOrderColumns {
    /// The required columns, in declaration order.
    pub fn required(&self) -> Vec<&str> {
        vec![self.staff_category.as_str(), self.order.as_str()]
    }
}

/// Column names for all four sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    /// Roster columns.
    pub roster: RosterColumns,
    /// Allocation extract columns.
    pub extract: ExtractColumns,
    /// Cost centre reference columns.
    pub cost_centre: CostCentreColumns,
    /// Category order columns.
    pub category_order: CategoryOrderColumns,
}

/// Limits on trend report windows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Largest number of months in one report.
    pub max_months: u32,
    /// Earliest accepted start year.
    pub min_year: i32,
    /// Latest accepted start year.
    pub max_year: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            max_months: 12,
            min_year: 2000,
            max_year: 3000,
        }
    }
}

/// Title and number format of one report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportConfig {
    /// Report title; `!` separates title lines.
    pub title: String,
    /// Decimal places shown for values.
    pub decimals: u32,
}

/// Settings for the three reports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// FTE trend by category.
    pub fte_trend: ReportConfig,
    /// Headcount trend by category.
    pub headcount_trend: ReportConfig,
    /// FTE by cost centre, category and rank.
    pub cost_centre_breakdown: ReportConfig,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            fte_trend: ReportConfig {
                title: "Yearly Department FTE Trend".to_string(),
                decimals: 2,
            },
            headcount_trend: ReportConfig {
                title: "Yearly Department Headcount Trend".to_string(),
                decimals: 0,
            },
            cost_centre_breakdown: ReportConfig {
                title: "Yearly Department FTE (Cost Centres) Trend".to_string(),
                decimals: 1,
            },
        }
    }
}

/// The complete engine configuration.
///
/// # Example
///
/// ```
/// use allocation_engine::config::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.cost_centre_code_width, 3);
/// assert_eq!(config.window.max_months, 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest accepted gap between a staff member's summed percentages and 100%.
    pub allocation_tolerance: Decimal,
    /// Width cost centre codes are zero-padded to.
    pub cost_centre_code_width: usize,
    /// Value of the enabled flag column that marks a cost centre as enabled.
    pub enabled_flag_value: String,
    /// Trend window limits.
    pub window: WindowConfig,
    /// Source column names.
    pub columns: ColumnsConfig,
    /// Report titles and formats.
    pub reports: ReportsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allocation_tolerance: Decimal::new(1, 6),
            cost_centre_code_width: 3,
            enabled_flag_value: "Enabled".to_string(),
            window: WindowConfig::default(),
            columns: ColumnsConfig::default(),
            reports: ReportsConfig::default(),
        }
    }
}
