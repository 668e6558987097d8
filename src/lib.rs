//! Staff Allocation Reconciliation and Period Aggregation Engine
//!
//! This crate reconciles a monthly staff roster with a percentage-based
//! cost centre allocation extract into normalized allocation facts, then
//! aggregates those facts across periods into ordered FTE, headcount and
//! cost centre summary tables.
//!
//! # Example
//!
//! ```
//! use allocation_engine::ReportingEngine;
//! use allocation_engine::models::Period;
//! use allocation_engine::source::{SourceTable, SourceTables};
//!
//! let tables = SourceTables {
//!     roster: SourceTable::from_str_rows(
//!         "roster",
//!         &["StaffNo", "Rank", "Section", "Staff Category", "FTE", "Default Cost Centre"],
//!         &[vec!["1", "R1", "Ops", "Senior", "1.0", "001"]],
//!     ),
//!     extract: SourceTable::from_str_rows(
//!         "extract",
//!         &["StaffNo", "Rank", "CCode", "CostCentre", "Allocated Percentage"],
//!         &[vec!["1", "R1", "001", "Admin", "60"], vec!["1", "R1", "002", "Teaching", "40"]],
//!     ),
//!     cost_centres: SourceTable::from_str_rows(
//!         "cost_centres",
//!         &["Value", "Description", "Enabled/ Disabled"],
//!         &[vec!["001", "Admin", "Enabled"], vec!["002", "Teaching", "Enabled"]],
//!     ),
//!     category_order: None,
//! };
//!
//! let engine = ReportingEngine::default();
//! let result = engine.reconcile("202507".parse::<Period>().unwrap(), &tables).unwrap();
//! assert_eq!(result.facts.len(), 2);
//! assert!(result.report.is_clean());
//! ```

#![warn(missing_docs)]

pub mod aggregation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod reconciliation;
pub mod report;
pub mod source;
pub mod store;

pub use engine::{PeriodFacts, ReportingEngine};
pub use error::{EngineError, EngineResult, ErrorKind};
