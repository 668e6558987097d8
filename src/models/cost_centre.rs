//! Cost centre reference data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry of the cost centre reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCentreInfo {
    /// Zero-padded cost centre code.
    pub code: String,
    /// Human-readable description.
    pub description: String,
    /// Only enabled cost centres appear in reconciled output.
    pub enabled: bool,
}

/// Outcome of looking a code up in a [`CostCentreDirectory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostCentreLookup<'a> {
    /// The code is enabled; carries its description.
    Enabled(&'a str),
    /// The code exists but is disabled.
    Disabled,
    /// The code is not in the reference table.
    Unknown,
}

/// Immutable code → cost centre mapping for one snapshot.
///
/// # Example
///
/// ```
/// use allocation_engine::models::{CostCentreDirectory, CostCentreInfo, CostCentreLookup};
///
/// let directory = CostCentreDirectory::new(vec![
///     CostCentreInfo { code: "001".into(), description: "Admin".into(), enabled: true },
///     CostCentreInfo { code: "002".into(), description: "Legacy".into(), enabled: false },
/// ]);
/// assert_eq!(directory.lookup("001"), CostCentreLookup::Enabled("Admin"));
/// assert_eq!(directory.lookup("002"), CostCentreLookup::Disabled);
/// assert_eq!(directory.lookup("003"), CostCentreLookup::Unknown);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCentreDirectory {
    entries: BTreeMap<String, CostCentreInfo>,
    #[serde(default)]
    disabled_rows: usize,
}

impl CostCentreDirectory {
    /// Builds the directory; a later entry for the same code replaces an earlier one.
    pub fn new(entries: Vec<CostCentreInfo>) -> Self {
        let disabled_rows = entries.iter().filter(|info| !info.enabled).count();
        let entries = entries
            .into_iter()
            .map(|info| (info.code.clone(), info))
            .collect();
        Self {
            entries,
            disabled_rows,
        }
    }

    /// Looks up a cost centre code.
    pub fn lookup(&self, code: &str) -> CostCentreLookup<'_> {
        match self.entries.get(code) {
            Some(info) if info.enabled => CostCentreLookup::Enabled(&info.description),
            Some(_) => CostCentreLookup::Disabled,
            None => CostCentreLookup::Unknown,
        }
    }

    /// Number of enabled cost centres.
    pub fn enabled_count(&self) -> usize {
        self.entries.values().filter(|info| info.enabled).count()
    }

    /// Number of disabled rows the directory was built from, repeated
    /// codes included.
    pub fn disabled_rows(&self) -> usize {
        self.disabled_rows
    }
}
