//! End-to-end tests for the allocation engine.
//!
//! This suite drives the public facade the way a caller would:
//! - Single-period reconciliation scenarios
//! - Multi-period trend and breakdown views
//! - CSV-loaded source tables
//! - Fact store persistence
//! - Error cases

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;

use allocation_engine::config::ConfigLoader;
use allocation_engine::models::{AllocationFact, Period, RowKind};
use allocation_engine::source::{SourceTable, SourceTables};
use allocation_engine::store::FactStore;
use allocation_engine::{EngineError, ErrorKind, PeriodFacts, ReportingEngine};

// =============================================================================
// Test Helpers
// =============================================================================

const FIXTURE_DIR: &str = "./tests/fixtures/period_202507";

fn create_engine() -> ReportingEngine {
    ReportingEngine::from_config_dir("./config/default").expect("Failed to load config")
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn period(label: &str) -> Period {
    label.parse().unwrap()
}

fn roster(rows: &[Vec<&str>]) -> SourceTable {
    SourceTable::from_str_rows(
        "roster",
        &["StaffNo", "Rank", "Section", "Staff Category", "FTE", "Default Cost Centre"],
        rows,
    )
}

fn extract(rows: &[Vec<&str>]) -> SourceTable {
    SourceTable::from_str_rows(
        "extract",
        &["StaffNo", "Rank", "CCode", "CostCentre", "Allocated Percentage"],
        rows,
    )
}

fn cost_centres() -> SourceTable {
    SourceTable::from_str_rows(
        "cost_centres",
        &["Value", "Description", "Enabled/ Disabled"],
        &[vec!["001", "Admin", "Enabled"], vec!["002", "Teaching", "Enabled"]],
    )
}

fn tables(roster_rows: &[Vec<&str>], extract_rows: &[Vec<&str>]) -> SourceTables {
    SourceTables {
        roster: roster(roster_rows),
        extract: extract(extract_rows),
        cost_centres: cost_centres(),
        category_order: None,
    }
}

fn single_senior() -> Vec<Vec<&'static str>> {
    vec![vec!["1", "R1", "Ops", "Senior", "1.0", "001"]]
}

fn allocation_by_staff(facts: &[AllocationFact]) -> BTreeMap<&str, Decimal> {
    let mut totals = BTreeMap::new();
    for fact in facts {
        *totals.entry(fact.staff_id.as_str()).or_insert(Decimal::ZERO) += fact.allocation;
    }
    totals
}

fn load_fixture_period(engine: &ReportingEngine) -> PeriodFacts {
    let tables = SourceTables::from_csv_dir(FIXTURE_DIR, 1).expect("Failed to load fixtures");
    let result = engine.reconcile(period("202507"), &tables).unwrap();
    let mut periods = PeriodFacts::new();
    periods.insert(period("202507"), result.facts);
    periods
}

// =============================================================================
// Single-period reconciliation
// =============================================================================

#[test]
fn test_staff_absent_from_extract_gets_full_fte_on_default_cost_centre() {
    let engine = create_engine();
    let result = engine.reconcile(period("202501"), &tables(&single_senior(), &[])).unwrap();

    assert_eq!(result.facts.len(), 1);
    assert_eq!(result.facts[0].staff_id, "1");
    assert_eq!(result.facts[0].cost_centre_code, "001");
    assert_eq!(result.facts[0].allocation, decimal("1.0"));
}

#[test]
fn test_split_allocation_matches_roster_fte() {
    let engine = create_engine();
    let result = engine
        .reconcile(
            period("202501"),
            &tables(
                &single_senior(),
                &[
                    vec!["1", "R1", "001", "Admin", "60"],
                    vec!["1", "R1", "002", "Teaching", "40"],
                ],
            ),
        )
        .unwrap();

    let allocations: Vec<Decimal> = result.facts.iter().map(|f| f.allocation).collect();
    assert_eq!(allocations, vec![decimal("0.6"), decimal("0.4")]);
    assert_eq!(allocation_by_staff(&result.facts)["1"], decimal("1.0"));
    assert!(result.report.incomplete_allocations.is_empty());
}

#[test]
fn test_ninety_percent_allocation_is_flagged_incomplete() {
    let engine = create_engine();
    let result = engine
        .reconcile(
            period("202501"),
            &tables(
                &single_senior(),
                &[
                    vec!["1", "R1", "001", "Admin", "60"],
                    vec!["1", "R1", "002", "Teaching", "30"],
                ],
            ),
        )
        .unwrap();

    let allocations: Vec<Decimal> = result.facts.iter().map(|f| f.allocation).collect();
    assert_eq!(allocations, vec![decimal("0.6"), decimal("0.3")]);
    assert_eq!(result.report.incomplete_allocations.len(), 1);
    assert_eq!(result.report.incomplete_allocations[0].staff_id, "1");
    assert_eq!(result.report.incomplete_allocations[0].observed_total, decimal("0.9"));
    assert_eq!(result.report.incomplete_allocation_labels(), vec!["1(0.9)"]);
}

#[test]
fn test_duplicate_roster_staff_fails_with_data_error() {
    let engine = create_engine();
    let err = engine
        .reconcile(
            period("202501"),
            &tables(
                &[
                    vec!["1", "R1", "Ops", "Senior", "1.0", "001"],
                    vec!["1", "R1", "Ops", "Senior", "1.0", "002"],
                ],
                &[],
            ),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SourceDataInvalid);
}

#[test]
fn test_reconciling_twice_gives_identical_facts() {
    let engine = create_engine();
    let input = tables(
        &[
            vec!["1", "R1", "Ops", "Senior", "1.0", "001"],
            vec!["2", "R2", "Ops", "Junior", "0.6", "002"],
            vec!["3", "R2", "Ops", "Junior", "0.4", "001"],
        ],
        &[
            vec!["2", "R2", "001", "Admin", "20"],
            vec!["2", "R2", "002", "Teaching", "80"],
        ],
    );

    let first = engine.reconcile(period("202501"), &input).unwrap();
    let second = engine.reconcile(period("202501"), &input).unwrap();
    assert_eq!(
        serde_json::to_string(&first.facts).unwrap(),
        serde_json::to_string(&second.facts).unwrap()
    );
    assert_ne!(first.run_id, second.run_id);
}

// =============================================================================
// Multi-period views
// =============================================================================

#[test]
fn test_start_month_thirteen_is_rejected_before_data() {
    let engine = create_engine();
    let err = engine.fte_trend(&PeriodFacts::new(), 2025, 13, 3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
}

#[test]
fn test_category_missing_in_later_period_leaves_blank_cell() {
    let engine = create_engine();
    let mut store = FactStore::new();
    engine
        .reconcile_into(
            &mut store,
            period("202501"),
            &tables(
                &[
                    vec!["1", "R1", "Ops", "Senior", "1.0", "001"],
                    vec!["2", "R2", "Ops", "Junior", "1.0", "002"],
                ],
                &[],
            ),
        )
        .unwrap();
    engine
        .reconcile_into(
            &mut store,
            period("202502"),
            &tables(&[vec!["2", "R2", "Ops", "Junior", "1.0", "002"]], &[]),
        )
        .unwrap();

    let table = engine.fte_trend(store.as_map(), 2025, 1, 2).unwrap();
    assert_eq!(table.value("Senior", period("202501")), Some(decimal("1.0")));
    assert_eq!(table.value("Senior", period("202502")), None);

    let total = table.total_row().unwrap();
    assert_eq!(total.values, vec![Some(decimal("2.0")), Some(decimal("1.0"))]);
}

#[test]
fn test_trend_rows_follow_category_order_with_total_last() {
    let engine = create_engine();
    let mut input = tables(
        &[
            vec!["1", "R1", "Ops", "Alpha", "1.0", "001"],
            vec!["2", "R2", "Ops", "Beta", "1.0", "001"],
            vec!["3", "R3", "Ops", "Gamma", "1.0", "001"],
        ],
        &[],
    );
    input.category_order = Some(SourceTable::from_str_rows(
        "category_order",
        &["Staff Category", "Order"],
        &[vec!["Gamma", "5"], vec!["Alpha", "50"], vec!["Beta", "5"]],
    ));

    let mut periods = PeriodFacts::new();
    periods.insert(period("202503"), engine.reconcile(period("202503"), &input).unwrap().facts);

    let table = engine.headcount_trend(&periods, 2025, 1, 12).unwrap();
    let labels: Vec<&str> = table.rows.iter().map(|r| r.staff_category.as_str()).collect();
    assert_eq!(labels, vec!["Beta", "Gamma", "Alpha", "Total"]);
    assert_eq!(table.rows.last().unwrap().kind, RowKind::Total);
}

#[test]
fn test_headcount_counts_staff_once_across_cost_centres() {
    let engine = create_engine();
    let result = engine
        .reconcile(
            period("202501"),
            &tables(
                &single_senior(),
                &[
                    vec!["1", "R1", "001", "Admin", "30"],
                    vec!["1", "R1", "002", "Teaching", "30"],
                    vec!["1", "R1", "001", "Admin", "40"],
                ],
            ),
        )
        .unwrap();
    assert_eq!(result.facts.len(), 3);

    let mut periods = PeriodFacts::new();
    periods.insert(period("202501"), result.facts);

    let headcount = engine.headcount_trend(&periods, 2025, 1, 1).unwrap();
    assert_eq!(headcount.value("Senior", period("202501")), Some(decimal("1")));
}

#[test]
fn test_window_with_no_data_is_no_periods_available() {
    let engine = create_engine();
    let mut periods = PeriodFacts::new();
    periods.insert(
        period("202406"),
        engine.reconcile(period("202406"), &tables(&single_senior(), &[])).unwrap().facts,
    );

    let err = engine.cost_centre_breakdown(&periods, 2025, 1, 12).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoPeriodsAvailable);
}

// =============================================================================
// CSV sources
// =============================================================================

#[test]
fn test_csv_period_reconciliation() {
    let engine = create_engine();
    let tables = SourceTables::from_csv_dir(FIXTURE_DIR, 1).unwrap();
    let result = engine.reconcile(period("202507"), &tables).unwrap();

    assert_eq!(result.facts.len(), 6);
    assert_eq!(result.total_allocation(), Some(decimal("3.0")));
    assert_eq!(result.report.orphan_staff_ids, vec!["9999"]);
    assert_eq!(result.report.incomplete_allocation_labels(), vec!["1003(0.9)"]);
    assert_eq!(result.report.disabled_cost_centres_removed, 1);
    assert_eq!(result.report.excluded_facts.len(), 1);
    assert_eq!(result.report.excluded_facts[0].cost_centre_code, "040");
    assert_eq!(result.report.excluded_facts[0].allocation, decimal("0.2"));
    assert_eq!(result.report.empty_rows_removed, 2);

    let default_fact = result.facts.last().unwrap();
    assert_eq!(default_fact.staff_id, "1004");
    assert_eq!(default_fact.cost_centre_code, "030");
    assert_eq!(default_fact.cost_centre_name, "Administration");
    assert_eq!(default_fact.staff_category_order, 2);
}

#[test]
fn test_csv_fte_trend_markdown() {
    let engine = create_engine();
    let periods = load_fixture_period(&engine);

    let report = engine.render_fte_trend(&periods, 2025, 7, 12).unwrap();
    assert_eq!(report.title, "Yearly Department FTE Trend 2025/2026");

    let markdown = report.to_markdown();
    assert!(markdown.starts_with("##### Yearly Department FTE Trend 2025/2026\n"));
    assert!(markdown.contains("| Staff Category | 202507 |"));
    assert!(markdown.contains("| Academic | 1.60 |"));
    assert!(markdown.contains("| Professional | 1.40 |"));
    assert!(markdown.contains("| **Total** | **3.00** |"));
}

#[test]
fn test_csv_headcount_trend() {
    let engine = create_engine();
    let periods = load_fixture_period(&engine);

    let table = engine.headcount_trend(&periods, 2025, 1, 12).unwrap();
    assert_eq!(table.value("Academic", period("202507")), Some(decimal("2")));
    assert_eq!(table.value("Professional", period("202507")), Some(decimal("2")));
    assert_eq!(table.total_row().unwrap().values, vec![Some(decimal("4"))]);
}

#[test]
fn test_csv_cost_centre_breakdown() {
    let engine = create_engine();
    let periods = load_fixture_period(&engine);

    let breakdowns = engine.cost_centre_breakdown(&periods, 2025, 7, 1).unwrap();
    let names: Vec<&str> = breakdowns.iter().map(|b| b.cost_centre_name.as_str()).collect();
    assert_eq!(names, vec!["Administration", "Research", "Teaching"]);

    let research = &breakdowns[1];
    assert_eq!(research.cost_centre_code, "020");
    let rows: Vec<(&str, &str)> = research
        .table
        .category_rows()
        .map(|r| (r.staff_category.as_str(), r.rank.as_deref().unwrap_or("")))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Academic", "Lecturer"),
            ("Academic", "Professor"),
            ("Professional", "Technician"),
        ]
    );

    let report = engine.render_cost_centre_breakdown(&periods, 2025, 7, 1).unwrap();
    assert_eq!(report.sections.len(), 3);
    assert!(report.sections[1].contains("|  | Professor | 0.4 |"));
}

#[test]
fn test_csv_missing_file_is_unreadable() {
    let err = SourceTables::from_csv_dir("./tests/fixtures/missing", 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceUnreadable);
}

#[test]
fn test_csv_wrong_header_row_is_schema_error() {
    let engine = create_engine();
    let tables = SourceTables::from_csv_dir(FIXTURE_DIR, 0).unwrap();
    let err = engine.reconcile(period("202507"), &tables).unwrap_err();

    match err {
        EngineError::SourceSchemaInvalid { source_name, missing } => {
            assert_eq!(source_name, "extract");
            assert_eq!(missing.len(), 5);
        }
        other => panic!("Expected SourceSchemaInvalid, got {:?}", other),
    }
}

// =============================================================================
// Persistence and configuration
// =============================================================================

#[test]
fn test_store_round_trip_preserves_reports() {
    let engine = create_engine();
    let mut store = FactStore::new();
    let tables = SourceTables::from_csv_dir(FIXTURE_DIR, 1).unwrap();
    engine.reconcile_into(&mut store, period("202507"), &tables).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("facts.json");
    store.save_json(&path).unwrap();
    let loaded = FactStore::load_json(&path).unwrap();

    assert_eq!(
        engine.fte_trend(store.as_map(), 2025, 7, 1).unwrap(),
        engine.fte_trend(loaded.as_map(), 2025, 7, 1).unwrap()
    );
}

#[test]
fn test_default_config_file_matches_built_in_defaults() {
    let loader = ConfigLoader::load("./config/default").unwrap();
    assert_eq!(loader.config(), create_engine().config());
    assert_eq!(
        loader.config(),
        &allocation_engine::config::EngineConfig::default()
    );
}

#[test]
fn test_every_error_kind_has_distinct_user_message() {
    let errors = vec![
        EngineError::SourceUnreadable {
            source_name: "roster".to_string(),
            message: "gone".to_string(),
        },
        EngineError::SourceSchemaInvalid {
            source_name: "roster".to_string(),
            missing: vec!["FTE".to_string()],
        },
        EngineError::data_invalid("roster", "duplicate"),
        EngineError::NoPeriodsAvailable {
            start: "202501".to_string(),
            months: 1,
        },
        EngineError::invalid_request("months", "zero"),
    ];

    let mut messages: Vec<&str> = errors.iter().map(|e| e.user_message()).collect();
    messages.sort();
    messages.dedup();
    assert_eq!(messages.len(), errors.len());
}
