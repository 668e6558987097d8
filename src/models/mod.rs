//! Core data models for the allocation engine.
//!
//! This module contains the fixed-shape records that flow through
//! reconciliation and aggregation.

mod aggregate;
mod allocation_fact;
mod category_order;
mod cost_centre;
mod period;
mod period_window;
mod reconciliation_result;
mod staff;

pub use aggregate::{
    AggregateMode, AggregateRow, AggregateTable, CostCentreBreakdown, RowKind, TOTAL_LABEL, accumulate,
};
pub use allocation_fact::AllocationFact;
pub use category_order::CategoryOrder;
pub use cost_centre::{CostCentreDirectory, CostCentreInfo, CostCentreLookup};
pub use period::Period;
pub use period_window::PeriodWindow;
pub use reconciliation_result::{
    AuditStep, AuditTrace, AuditWarning, ExcludedFact, IncompleteAllocation, RankConflict,
    ReconciliationReport, ReconciliationResult,
};
pub use staff::{AllocationExtractRecord, StaffRecord};
