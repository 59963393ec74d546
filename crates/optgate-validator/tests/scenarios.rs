//! End-to-end validator scenarios.
//!
//! Each test builds a baseline and candidate report the way the report
//! producer would and checks the resulting verdict.

use optgate_core::{Cell, Dataset, HashAlgorithm, Record, Report, ReportMetadata};
use optgate_validator::{
    compare_datasets, validate, BandPosition, Difference, GateProfile, Status, Validator, Verdict,
};
use serde_json::json;

fn padded_hash(prefix: &str) -> String {
    format!("{:0<64}", prefix)
}

fn report(runtime: f64, rows: u64, hash: &str) -> Report {
    Report::new(
        ReportMetadata::new()
            .pipeline("pipeline_c")
            .with_runtime(runtime)
            .with_output(rows, hash)
            .with_work(rows, Some(1_000_000))
            .with_hash_algorithm(HashAlgorithm::Sha256),
    )
}

fn records(values: Vec<serde_json::Value>) -> Vec<Record> {
    values
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_identical_reports_pass() {
    let hash = padded_hash("abc123");
    let verdict = validate(&report(30.0, 53000, &hash), &report(27.5, 53000, &hash));

    assert_eq!(verdict.equivalence.status, Status::Pass);
    assert_eq!(verdict.performance.status, Status::Pass);
    assert_eq!(verdict.overall_status, Status::Pass);
    assert_eq!(verdict.exit_code(), 0);

    let pct = verdict.performance.improvement_pct.unwrap();
    assert!((pct - 8.333333333333334).abs() < 1e-9);
    assert_eq!(verdict.performance.band, BandPosition::Within);

    let criteria = &verdict.success_criteria;
    assert!(criteria.output_hash_matches_baseline);
    assert!(criteria.row_count_matches_baseline);
    assert!(criteria.runtime_improved);
    assert!(criteria.improvement_in_target_range);
}

#[test]
fn test_slower_candidate_fails() {
    let hash = padded_hash("abc123");
    let verdict = validate(&report(30.0, 53000, &hash), &report(31.0, 53000, &hash));

    assert_eq!(verdict.equivalence.status, Status::Pass);
    assert_eq!(verdict.performance.status, Status::Fail);
    assert_eq!(verdict.overall_status, Status::Fail);
    assert_eq!(verdict.exit_code(), 1);
    assert!(verdict.summary.contains("performance_improvement"));
}

#[test]
fn test_hash_mismatch_fails_regardless_of_runtime() {
    let baseline_hash = padded_hash("abc123");
    let candidate_hash = padded_hash("def456");
    let verdict = validate(
        &report(30.0, 53000, &baseline_hash),
        &report(10.0, 53000, &candidate_hash),
    );

    assert_eq!(verdict.equivalence.status, Status::Fail);
    assert_eq!(verdict.performance.status, Status::Pass);
    assert_eq!(verdict.overall_status, Status::Fail);

    let findings = verdict.equivalence.findings.join("\n");
    assert!(findings.contains("abc1230000000000..."));
    assert!(findings.contains("def4560000000000..."));
    assert_eq!(verdict.equivalence.candidate_hash.as_deref(), Some(candidate_hash.as_str()));
}

#[test]
fn test_tabular_diff_amounts() {
    let columns = vec!["portfolio_id".to_string(), "amount".to_string()];
    let baseline = Dataset::with_rows(
        columns.clone(),
        vec![
            vec![Cell::Text("P1".into()), Cell::Number(100.00)],
            vec![Cell::Text("P2".into()), Cell::Number(100.00)],
        ],
    )
    .unwrap();
    let candidate = Dataset::with_rows(
        columns,
        vec![
            vec![Cell::Text("P1".into()), Cell::Number(100.0000000001)],
            vec![Cell::Text("P2".into()), Cell::Number(100.01)],
        ],
    )
    .unwrap();

    let diff = compare_datasets(&baseline, &candidate);
    assert_eq!(diff.status, Status::Fail);

    let values = diff.values.as_ref().unwrap();
    assert_eq!(values.total_differences, 1);
    assert_eq!(values.identical_rows, 1);
    assert_eq!(values.different_rows, 1);

    match &values.first_differences[0] {
        Difference::AmountMismatch { row, column, delta, .. } => {
            assert_eq!(*row, 1);
            assert_eq!(column, "amount");
            assert!((delta - 0.01).abs() < 1e-9);
        }
        other => panic!("unexpected difference {:?}", other),
    }
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_validate_is_deterministic() {
    let hash = padded_hash("feed");
    let baseline = report(30.0, 100, &hash);
    let candidate = report(29.0, 100, &hash);

    let first = validate(&baseline, &candidate);
    let second = validate(&baseline, &candidate);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_zero_baseline_runtime_is_safe() {
    let hash = padded_hash("00");
    let verdict = validate(&report(0.0, 1, &hash), &report(0.0, 1, &hash));
    assert_eq!(verdict.performance.improvement_pct, None);
    assert_eq!(verdict.overall_status, Status::Pass);

    let json = serde_json::to_value(&verdict).unwrap();
    assert!(json["performance"]["improvement_pct"].is_null());
}

#[test]
fn test_advisory_warnings_do_not_flip_pass() {
    let hash = padded_hash("cafe");
    let baseline = report(30.0, 100, &hash);
    let mut candidate = report(28.0, 100, &hash);
    candidate.metadata.work.as_mut().unwrap().bytes_scanned = Some(5_000_000);

    let verdict = validate(&baseline, &candidate);
    assert_eq!(verdict.work_metrics.status, Status::Warn);
    assert_eq!(verdict.cost_metrics.status, Status::Warn);
    assert_eq!(verdict.overall_status, Status::Pass);
    assert!(verdict.summary.starts_with("Passed with warnings"));
}

#[test]
fn test_complexity_never_gates() {
    let hash = padded_hash("beef");
    let mut baseline = report(30.0, 100, &hash);
    let mut candidate = report(28.0, 100, &hash);
    baseline.metadata = baseline.metadata.with_complexity(2.0, 1);
    candidate.metadata = candidate.metadata.with_complexity(9.5, 12);

    let verdict = validate(&baseline, &candidate);
    assert_eq!(verdict.overall_status, Status::Pass);
}

#[test]
fn test_missing_data_fails_without_panicking() {
    let verdict = validate(
        &Report::new(ReportMetadata::new()),
        &Report::new(ReportMetadata::new()),
    );
    assert_eq!(verdict.overall_status, Status::Fail);
    assert_eq!(verdict.equivalence.status, Status::Fail);
    assert_eq!(verdict.performance.status, Status::Fail);
    assert_eq!(verdict.work_metrics.status, Status::Warn);
    assert_eq!(verdict.cost_metrics.status, Status::Warn);
}

#[test]
fn test_verdict_round_trips_through_json() {
    let hash = padded_hash("1234");
    let verdict = validate(&report(30.0 / 7.0, 53000, &hash), &report(1.0 / 3.0, 53000, &hash));

    let json = serde_json::to_string_pretty(&verdict).unwrap();
    let reloaded: Verdict = serde_json::from_str(&json).unwrap();
    assert_eq!(verdict, reloaded);
    assert_eq!(reloaded.equivalence.baseline_hash.as_deref().map(str::len), Some(64));
}

// =============================================================================
// Retained data
// =============================================================================

#[test]
fn test_retained_data_is_diffed() {
    let rows = records(vec![
        json!({"portfolio_id": "P1", "amount": 100.0}),
        json!({"portfolio_id": "P2", "amount": 250.0}),
    ]);
    let baseline = Report::from_output(rows.clone(), 30.0, HashAlgorithm::Sha256);
    let candidate = Report::from_output(rows, 28.0, HashAlgorithm::Sha256);

    let verdict = validate(&baseline, &candidate);
    assert_eq!(verdict.overall_status, Status::Pass);
    assert!(verdict.tabular.as_ref().unwrap().is_match());
}

#[test]
fn test_retained_data_difference_fails_equivalence() {
    let baseline_rows = records(vec![json!({"portfolio_id": "P1", "amount": 100.0})]);
    let candidate_rows = records(vec![json!({"portfolio_id": "P1", "amount": 100.01})]);
    let baseline = Report::from_output(baseline_rows, 30.0, HashAlgorithm::Sha256);
    let candidate = Report::from_output(candidate_rows, 28.0, HashAlgorithm::Sha256);

    let verdict = validate(&baseline, &candidate);
    assert!(!verdict.equivalence.hash_match);
    assert_eq!(verdict.equivalence.status, Status::Fail);
    let tabular = verdict.tabular.as_ref().unwrap();
    assert_eq!(tabular.values.as_ref().unwrap().total_differences, 1);
}

#[test]
fn test_ragged_retained_data_fails_equivalence() {
    let hash = padded_hash("feed");
    let mut baseline = report(30.0, 2, &hash);
    let mut candidate = report(28.0, 2, &hash);
    baseline.data = Some(records(vec![json!({"a": 1}), json!({"a": 1, "b": 2})]));
    candidate.data = Some(records(vec![json!({"a": 1}), json!({"a": 1, "b": 999})]));

    let verdict = validate(&baseline, &candidate);
    assert!(verdict.equivalence.hash_match);
    assert_eq!(verdict.equivalence.status, Status::Fail);
    assert!(verdict
        .equivalence
        .findings
        .iter()
        .any(|f| f.starts_with("Comparison failed")));
    assert!(verdict.tabular.is_none());
    assert_eq!(verdict.overall_status, Status::Fail);
}

#[test]
fn test_key_order_in_records_keeps_hash() {
    let a = records(vec![json!({"portfolio_id": "P1", "amount": 100.0})]);
    let b = records(vec![json!({"amount": 100.0, "portfolio_id": "P1"})]);
    let baseline = Report::from_output(a, 30.0, HashAlgorithm::Sha256);
    let candidate = Report::from_output(b, 29.0, HashAlgorithm::Sha256);

    let verdict = validate(&baseline, &candidate);
    assert!(verdict.equivalence.hash_match);
    assert!(verdict.tabular.as_ref().unwrap().columns.matches);
    assert_eq!(verdict.overall_status, Status::Pass);
}

#[test]
fn test_custom_profile_band() {
    let profile = GateProfile::from_yaml("name: wide@1.0\ntarget_band:\n  min_pct: 1.0\n  max_pct: 50.0\n").unwrap();
    let hash = padded_hash("77");
    let verdict = Validator::new(profile).validate(&report(30.0, 1, &hash), &report(20.0, 1, &hash));
    assert_eq!(verdict.profile, "wide@1.0");
    assert!(verdict.success_criteria.improvement_in_target_range);
}
