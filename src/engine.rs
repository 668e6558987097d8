//! The reporting engine facade.
//!
//! [`ReportingEngine`] ties configuration to the reconciliation and
//! aggregation entry points. Reconciliation is per period and stateless;
//! the aggregation views take the full period map once every period has
//! been reconciled.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::aggregation;
use crate::config::{ConfigLoader, EngineConfig, ReportConfig};
use crate::error::EngineResult;
use crate::models::{
    AggregateTable, AllocationFact, CostCentreBreakdown, Period, PeriodWindow,
    ReconciliationResult,
};
use crate::reconciliation::reconcile_period;
use crate::report::{RenderedReport, render_cost_centre_section, render_markdown, report_title};
use crate::source::SourceTables;
use crate::store::{FactStore, StoreUpdate};

/// Per-period facts, keyed and ordered by period.
pub type PeriodFacts = BTreeMap<Period, Vec<AllocationFact>>;

/// Entry point for reconciling periods and building reports.
///
/// Cheap to clone; clones share the configuration.
///
/// # Example
///
/// ```
/// use allocation_engine::ReportingEngine;
/// use allocation_engine::config::EngineConfig;
/// use allocation_engine::error::ErrorKind;
/// use std::collections::BTreeMap;
///
/// let engine = ReportingEngine::new(EngineConfig::default());
/// let err = engine.fte_trend(&BTreeMap::new(), 2025, 13, 1).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::InvalidRequest);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReportingEngine {
    config: Arc<EngineConfig>,
}

impl ReportingEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates an engine from `<dir>/engine.yaml`.
    pub fn from_config_dir<P: AsRef<Path>>(dir: P) -> EngineResult<Self> {
        Ok(Self::new(ConfigLoader::load(dir)?.into_config()))
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validates a trend window against the configured limits.
    pub fn window(&self, start_year: i32, start_month: u32, months: u32) -> EngineResult<PeriodWindow> {
        PeriodWindow::new(start_year, start_month, months, &self.config.window)
    }

    /// Reconciles one period.
    pub fn reconcile(&self, period: Period, tables: &SourceTables) -> EngineResult<ReconciliationResult> {
        reconcile_period(period, tables, &self.config)
    }

    /// Reconciles every period independently.
    ///
    /// A failed period does not affect the others; each entry carries its
    /// own result.
    pub fn reconcile_all(
        &self,
        inputs: &BTreeMap<Period, SourceTables>,
    ) -> BTreeMap<Period, EngineResult<ReconciliationResult>> {
        let results: BTreeMap<Period, EngineResult<ReconciliationResult>> = inputs
            .iter()
            .map(|(period, tables)| (*period, self.reconcile(*period, tables)))
            .collect();

        let failed = results.values().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(periods = results.len(), failed, "Some periods failed to reconcile");
        } else {
            info!(periods = results.len(), "All periods reconciled");
        }
        results
    }

    /// Reconciles a period and records its facts in `store`.
    ///
    /// Nothing is recorded if reconciliation fails.
    pub fn reconcile_into(
        &self,
        store: &mut FactStore,
        period: Period,
        tables: &SourceTables,
    ) -> EngineResult<(StoreUpdate, ReconciliationResult)> {
        let result = self.reconcile(period, tables)?;
        let update = store.record_period(period, result.facts.clone());
        Ok((update, result))
    }

    /// FTE per staff category over a window of months.
    pub fn fte_trend(
        &self,
        periods: &PeriodFacts,
        start_year: i32,
        start_month: u32,
        months: u32,
    ) -> EngineResult<AggregateTable> {
        let window = self.window(start_year, start_month, months)?;
        aggregation::fte_trend(periods, &window)
    }

    /// Distinct staff per staff category over a window of months.
    pub fn headcount_trend(
        &self,
        periods: &PeriodFacts,
        start_year: i32,
        start_month: u32,
        months: u32,
    ) -> EngineResult<AggregateTable> {
        let window = self.window(start_year, start_month, months)?;
        aggregation::headcount_trend(periods, &window)
    }

    /// FTE per cost centre, staff category and rank over a window of months.
    pub fn cost_centre_breakdown(
        &self,
        periods: &PeriodFacts,
        start_year: i32,
        start_month: u32,
        months: u32,
    ) -> EngineResult<Vec<CostCentreBreakdown>> {
        let window = self.window(start_year, start_month, months)?;
        aggregation::cost_centre_breakdown(periods, &window)
    }

    /// The FTE trend rendered as markdown.
    pub fn render_fte_trend(
        &self,
        periods: &PeriodFacts,
        start_year: i32,
        start_month: u32,
        months: u32,
    ) -> EngineResult<RenderedReport> {
        let window = self.window(start_year, start_month, months)?;
        let table = aggregation::fte_trend(periods, &window)?;
        Ok(single_section(&self.config.reports.fte_trend, &window, &table))
    }

    /// The headcount trend rendered as markdown.
    pub fn render_headcount_trend(
        &self,
        periods: &PeriodFacts,
        start_year: i32,
        start_month: u32,
        months: u32,
    ) -> EngineResult<RenderedReport> {
        let window = self.window(start_year, start_month, months)?;
        let table = aggregation::headcount_trend(periods, &window)?;
        Ok(single_section(&self.config.reports.headcount_trend, &window, &table))
    }

    /// The cost centre breakdown rendered as markdown, one section per cost centre.
    pub fn render_cost_centre_breakdown(
        &self,
        periods: &PeriodFacts,
        start_year: i32,
        start_month: u32,
        months: u32,
    ) -> EngineResult<RenderedReport> {
        let window = self.window(start_year, start_month, months)?;
        let breakdowns = aggregation::cost_centre_breakdown(periods, &window)?;
        let report = &self.config.reports.cost_centre_breakdown;

        Ok(RenderedReport {
            title: report_title(&report.title, &window),
            sections: breakdowns
                .iter()
                .map(|breakdown| render_cost_centre_section(breakdown, report.decimals))
                .collect(),
        })
    }
}

fn single_section(report: &ReportConfig, window: &PeriodWindow, table: &AggregateTable) -> RenderedReport {
    RenderedReport {
        title: report_title(&report.title, window),
        sections: vec![render_markdown(table, report.decimals)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::source::SourceTable;

    fn tables(extract_rows: &[Vec<&str>]) -> SourceTables {
        SourceTables {
            roster: SourceTable::from_str_rows(
                "roster",
                &["StaffNo", "Rank", "Section", "Staff Category", "FTE", "Default Cost Centre"],
                &[
                    vec!["1", "R1", "Ops", "Senior", "1.0", "001"],
                    vec!["2", "R2", "Ops", "Junior", "0.5", "002"],
                ],
            ),
            extract: SourceTable::from_str_rows(
                "extract",
                &["StaffNo", "Rank", "CCode", "CostCentre", "Allocated Percentage"],
                extract_rows,
            ),
            cost_centres: SourceTable::from_str_rows(
                "cost_centres",
                &["Value", "Description", "Enabled/ Disabled"],
                &[vec!["1", "Admin", "Enabled"], vec!["2", "Teaching", "Enabled"]],
            ),
            category_order: None,
        }
    }

    fn p(label: &str) -> Period {
        label.parse().unwrap()
    }

    #[test]
    fn test_reconcile_all_isolates_failures() {
        let engine = ReportingEngine::default();
        let mut inputs = BTreeMap::new();
        inputs.insert(p("202501"), tables(&[]));
        inputs.insert(p("202502"), tables(&[vec!["1", "R9", "001", "Admin", "100"]]));

        let results = engine.reconcile_all(&inputs);
        assert!(results[&p("202501")].is_ok());
        assert_eq!(
            results[&p("202502")].as_ref().unwrap_err().kind(),
            ErrorKind::SourceDataInvalid
        );
    }

    #[test]
    fn test_reconcile_into_records_facts() {
        let engine = ReportingEngine::default();
        let mut store = FactStore::new();

        let (update, result) = engine.reconcile_into(&mut store, p("202501"), &tables(&[])).unwrap();
        assert_eq!(update, StoreUpdate::Inserted);
        assert_eq!(store.facts(p("202501")).unwrap(), result.facts.as_slice());

        let (update, _) = engine.reconcile_into(&mut store, p("202501"), &tables(&[])).unwrap();
        assert_eq!(update, StoreUpdate::Replaced);
    }

    #[test]
    fn test_failed_reconcile_records_nothing() {
        let engine = ReportingEngine::default();
        let mut store = FactStore::new();
        let result = engine.reconcile_into(
            &mut store,
            p("202501"),
            &tables(&[vec!["1", "R9", "001", "Admin", "100"]]),
        );
        assert!(result.is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_window_is_validated_before_data() {
        let engine = ReportingEngine::default();
        let err = engine.headcount_trend(&PeriodFacts::new(), 2025, 1, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);

        let err = engine.headcount_trend(&PeriodFacts::new(), 2025, 1, 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoPeriodsAvailable);
    }

    #[test]
    fn test_render_fte_trend_title_and_decimals() {
        let engine = ReportingEngine::default();
        let mut store = FactStore::new();
        engine.reconcile_into(&mut store, p("202507"), &tables(&[])).unwrap();

        let report = engine.render_fte_trend(store.as_map(), 2025, 7, 12).unwrap();
        assert_eq!(report.title, "Yearly Department FTE Trend 2025/2026");
        assert_eq!(report.sections.len(), 1);
        assert!(report.sections[0].contains("| Junior | 0.50 |"));
        assert!(report.sections[0].contains("| **Total** | **1.50** |"));
    }

    #[test]
    fn test_render_cost_centre_breakdown_sections() {
        let engine = ReportingEngine::default();
        let mut store = FactStore::new();
        engine.reconcile_into(&mut store, p("202501"), &tables(&[])).unwrap();

        let report = engine.render_cost_centre_breakdown(store.as_map(), 2025, 1, 1).unwrap();
        assert_eq!(report.title, "Yearly Department FTE (Cost Centres) Trend 2025");
        assert_eq!(report.sections.len(), 2);
        assert!(report.sections[0].starts_with("##### Cost Centre : Admin (001)"));
        assert!(report.sections[1].starts_with("##### Cost Centre : Teaching (002)"));
    }
}
