//! Detection rule evaluation against anomaly results.
//!
//! Rule conditions and detection rules get their evaluation methods here
//! (`RuleCondition::is_satisfied`, `DetectionRule::filter`); [`ResultFilter`]
//! applies a whole rule set to a bucket.

mod composition;
mod conditions;

use bucketwatch_core::{AnomalyRecord, Bucket};
use tracing::debug;

use crate::schema::DetectionRule;
use crate::value_list::ValueListLookup;

/// Applies a job's detection rules to scored results.
pub struct ResultFilter<'a, L: ValueListLookup + ?Sized> {
    rules: &'a [DetectionRule],
    lists: &'a L,
}

/// A bucket with filtered records removed.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub bucket: Bucket,
    /// Number of records dropped.
    pub suppressed: usize,
}

impl<'a, L: ValueListLookup + ?Sized> ResultFilter<'a, L> {
    pub fn new(rules: &'a [DetectionRule], lists: &'a L) -> Self {
        Self { rules, lists }
    }

    /// True when any rule suppresses `record`.
    pub fn is_filtered(&self, record: &AnomalyRecord) -> bool {
        self.rules.iter().any(|rule| rule.filter(record, self.lists))
    }

    /// Build a new bucket without the suppressed records.
    ///
    /// Bucket scores are left as reported upstream.
    pub fn apply(&self, bucket: &Bucket) -> FilterOutcome {
        if self.rules.is_empty() {
            return FilterOutcome {
                bucket: bucket.clone(),
                suppressed: 0,
            };
        }

        let kept: Vec<AnomalyRecord> = bucket
            .records
            .iter()
            .filter(|record| {
                let filtered = self.is_filtered(record);
                if filtered {
                    debug!(
                        job_id = %bucket.job_id,
                        detector = record.detector_index,
                        by = record.by_field_value.as_deref().unwrap_or(""),
                        partition = record.partition_field_value.as_deref().unwrap_or(""),
                        "record suppressed by detection rule"
                    );
                }
                !filtered
            })
            .cloned()
            .collect();

        let suppressed = bucket.records.len() - kept.len();
        FilterOutcome {
            bucket: bucket.with_records(kept),
            suppressed,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;
    use crate::value_list::{NoValueLists, ValueLists};
    use chrono::{TimeZone, Utc};

    fn record(host: &str, actual: f64) -> AnomalyRecord {
        AnomalyRecord {
            actual: vec![actual],
            typical: vec![1.0],
            normalized_probability: 50.0,
            partition_field_name: Some("host".to_string()),
            partition_field_value: Some(host.to_string()),
            ..AnomalyRecord::default()
        }
    }

    fn bucket(records: Vec<AnomalyRecord>) -> Bucket {
        let mut bucket = Bucket::new("job", Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        bucket.anomaly_score = 80.0;
        bucket.record_count = records.len();
        bucket.records = records;
        bucket
    }

    #[test]
    fn removes_filtered_records() {
        let rules = vec![DetectionRule::new(
            Connective::Or,
            vec![RuleCondition::numerical(
                RuleConditionType::NumericalActual,
                None,
                None,
                Condition::new(Operator::Lt, "5").unwrap(),
            )
            .unwrap()],
        )];
        let input = bucket(vec![record("a", 1.0), record("b", 10.0), record("c", 2.0)]);

        let outcome = ResultFilter::new(&rules, &NoValueLists).apply(&input);

        assert_eq!(outcome.suppressed, 2);
        assert_eq!(outcome.bucket.records.len(), 1);
        assert_eq!(outcome.bucket.record_count, 1);
        assert_eq!(outcome.bucket.anomaly_score, 80.0);
        // Input is untouched.
        assert_eq!(input.records.len(), 3);
    }

    #[test]
    fn any_rule_suffices() {
        let mut lists = ValueLists::new();
        lists.insert("quiet", ["b"]);
        let rules = vec![
            DetectionRule::new(Connective::Or, vec![RuleCondition::categorical("host", "quiet")]),
            DetectionRule::new(Connective::Or, vec![]),
        ];
        let input = bucket(vec![record("a", 1.0), record("b", 1.0)]);

        let outcome = ResultFilter::new(&rules, &lists).apply(&input);
        assert_eq!(outcome.suppressed, 1);
        assert_eq!(outcome.bucket.records[0].partition_field_value.as_deref(), Some("a"));
    }

    #[test]
    fn no_rules_keeps_everything() {
        let input = bucket(vec![record("a", 1.0)]);
        let outcome = ResultFilter::new(&[], &NoValueLists).apply(&input);
        assert_eq!(outcome.suppressed, 0);
        assert_eq!(outcome.bucket, input);
    }
}
