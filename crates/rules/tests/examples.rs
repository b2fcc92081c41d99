//! Integration tests that verify every example document in
//! `data/rules/examples/` loads, validates and behaves as documented.

use bucketwatch_core::{read_buckets, Bucket};
use bucketwatch_rules::loader::LoadStatus;
use bucketwatch_rules::schema::{AlertType, Connective, RuleConditionType};
use bucketwatch_rules::validation::validate_document;
use bucketwatch_rules::{AlertObserver, RuleLoader, RuleSnapshot};
use std::sync::Arc;

/// Resolve a directory relative to the workspace root.
/// Integration tests run from the crate directory, so we go up two levels.
fn workspace_path(rel: &str) -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.join("../..").join(rel)
}

fn load_examples() -> Arc<RuleSnapshot> {
    let loader = RuleLoader::new(workspace_path("data/rules/examples"));
    let results = loader.load_all().expect("scan examples");
    for result in &results {
        assert!(
            matches!(result.status, LoadStatus::Loaded { .. }),
            "{} did not load: {:?}",
            result.path.display(),
            result.status
        );
    }
    loader.snapshot()
}

fn sample_buckets() -> Vec<Bucket> {
    let file = std::fs::File::open(workspace_path("data/buckets/sample.ndjson")).unwrap();
    read_buckets(std::io::BufReader::new(file))
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn all_examples_load_without_warnings() {
    let snapshot = load_examples();
    assert_eq!(snapshot.job_count(), 2);
    assert!(snapshot.value_lists().has_list("maintenance-hosts"));

    for job in snapshot.jobs() {
        let doc = bucketwatch_rules::schema::RuleDocument::JobRules(job.clone());
        let result = validate_document(&doc, snapshot.value_lists());
        assert!(result.valid, "{}: {:?}", job.job_id(), result.errors);
        assert!(result.warnings.is_empty(), "{}: {:?}", job.job_id(), result.warnings);
    }
}

#[test]
fn web_latency_example_shape() {
    let snapshot = load_examples();
    let job = snapshot.job("web-latency").unwrap();

    assert_eq!(job.detection_rules.len(), 2);
    let canary = &job.detection_rules[1];
    assert_eq!(canary.target_field_value(), Some("canary-01"));
    assert_eq!(canary.conditions_connective(), Connective::And);
    assert_eq!(
        canary.to_string(),
        "FILTER_RESULTS (host:canary-01) IF ACTUAL < 50.000000"
    );

    assert_eq!(job.alert_triggers[1].alert_type(), AlertType::Influencer);
}

#[test]
fn cpu_drift_example_shape() {
    let snapshot = load_examples();
    let job = snapshot.job("cpu-drift").unwrap();
    let conditions = job.detection_rules[0].rule_conditions();
    assert_eq!(conditions[0].condition_type(), RuleConditionType::NumericalDiffAbs);
    assert_eq!(conditions[0].field_value(), Some("cpu_idle"));
    assert!(job.alert_triggers[0].include_interim());
}

#[test]
fn sample_buckets_filter_and_alert() {
    let snapshot = load_examples();
    let buckets = sample_buckets();
    assert_eq!(buckets.len(), 3);

    // First web-latency bucket: maintenance host and quiet canary are dropped.
    let filter = snapshot.result_filter("web-latency").unwrap();
    let outcome = filter.apply(&buckets[0]);
    assert_eq!(outcome.suppressed, 2);
    assert_eq!(
        outcome.bucket.records[0].partition_field_value.as_deref(),
        Some("web-03")
    );

    let job = snapshot.job("web-latency").unwrap();
    let observer = AlertObserver::new(job.job_id(), job.alert_triggers.clone());
    assert_eq!(observer.triggered_alerts(&outcome.bucket).len(), 2);
    assert!(!observer.evaluate(&buckets[1]));

    // Interim cpu-drift bucket: record is filtered, bucket influencer still alerts.
    let filter = snapshot.result_filter("cpu-drift").unwrap();
    let outcome = filter.apply(&buckets[2]);
    assert_eq!(outcome.suppressed, 1);

    let job = snapshot.job("cpu-drift").unwrap();
    let observer = AlertObserver::new(job.job_id(), job.alert_triggers.clone());
    let alert = observer.create_alert(&outcome.bucket, &job.alert_triggers[0]);
    assert!(observer.evaluate(&outcome.bucket));
    assert!(alert.is_interim);
    assert!(alert.bucket().is_some());
}
