//! Configuration loading and management for the allocation engine.
//!
//! This module loads engine settings (source column names, tolerances,
//! window limits and report formats) from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use allocation_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/default").unwrap();
//! println!("Tolerance: {}", loader.config().allocation_tolerance);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CategoryOrderColumns, ColumnsConfig, CostCentreColumns, EngineConfig, ExtractColumns,
    ReportConfig, ReportsConfig, RosterColumns, WindowConfig,
};
