//! Period fact store.
//!
//! Holds the reconciled fact table of every period, keyed by period, and
//! persists the whole set as one JSON document. Recording a period that is
//! already present replaces its facts.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{AllocationFact, Period};

const STORE_NAME: &str = "fact_store";

/// Outcome of [`FactStore::record_period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreUpdate {
    /// The period was new.
    Inserted,
    /// The period existed and its facts were replaced.
    Replaced,
}

/// Fact tables by period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactStore {
    periods: BTreeMap<Period, Vec<AllocationFact>>,
}

impl FactStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a period's facts, replacing any earlier facts for it.
    pub fn record_period(&mut self, period: Period, facts: Vec<AllocationFact>) -> StoreUpdate {
        let rows = facts.len();
        let update = match self.periods.insert(period, facts) {
            Some(_) => StoreUpdate::Replaced,
            None => StoreUpdate::Inserted,
        };
        debug!(period = %period, rows, update = ?update, "Recorded period facts");
        update
    }

    /// Facts of one period.
    pub fn facts(&self, period: Period) -> Option<&[AllocationFact]> {
        self.periods.get(&period).map(Vec::as_slice)
    }

    /// Stored periods in chronological order.
    pub fn periods(&self) -> Vec<Period> {
        self.periods.keys().copied().collect()
    }

    /// The full period map, as consumed by the aggregation views.
    pub fn as_map(&self) -> &BTreeMap<Period, Vec<AllocationFact>> {
        &self.periods
    }

    /// Number of stored periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Returns true if no period is stored.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Writes the store as pretty-printed JSON, creating parent directories.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> EngineResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| unreadable(path, e))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| unreadable(path, e))?;
        fs::write(path, json).map_err(|e| unreadable(path, e))?;

        info!(path = %path.display(), periods = self.len(), "Saved fact store");
        Ok(())
    }

    /// Reads a store written by [`FactStore::save_json`].
    pub fn load_json<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| unreadable(path, e))?;
        let store: Self = serde_json::from_str(&content).map_err(|e| unreadable(path, e))?;

        debug!(path = %path.display(), periods = store.len(), "Loaded fact store");
        Ok(store)
    }
}

fn unreadable(path: &Path, error: impl std::fmt::Display) -> EngineError {
    EngineError::SourceUnreadable {
        source_name: STORE_NAME.to_string(),
        message: format!("{}: {}", path.display(), error),
    }
}
