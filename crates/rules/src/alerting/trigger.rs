//! Evaluation of a single [`AlertTrigger`] against a bucket.

use std::cmp::Ordering;

use bucketwatch_core::{AnomalyRecord, Bucket};

use crate::schema::{compare, AlertTrigger, AlertType};

/// `value >= threshold`, inclusive. An unset threshold is never satisfied.
///
/// Every threshold check in alerting goes through here.
pub fn is_greater_or_equal(value: f64, threshold: Option<f64>) -> bool {
    threshold.is_some_and(|threshold| compare(value, threshold) != Ordering::Less)
}

impl AlertTrigger {
    /// Whether this trigger fires for `bucket`.
    pub fn is_triggered(&self, bucket: &Bucket) -> bool {
        if bucket.is_interim && !self.include_interim() {
            return false;
        }

        match self.alert_type() {
            AlertType::Bucket => {
                is_greater_or_equal(bucket.max_normalized_probability, self.normalised_threshold())
                    || self.triggers_anomaly_threshold(bucket.anomaly_score)
            }
            AlertType::BucketInfluencer => bucket
                .bucket_influencers
                .iter()
                .any(|bi| self.triggers_anomaly_threshold(bi.anomaly_score)),
            AlertType::Influencer => bucket
                .influencers
                .iter()
                .any(|inf| self.triggers_anomaly_threshold(inf.anomaly_score)),
        }
    }

    /// The inclusive anomaly-score test on its own.
    pub fn triggers_anomaly_threshold(&self, value: f64) -> bool {
        is_greater_or_equal(value, self.anomaly_threshold())
    }

    /// Records whose normalized probability meets the normalised threshold,
    /// each stamped with the bucket's timestamp. Empty when the threshold
    /// is unset.
    pub fn extract_records(&self, bucket: &Bucket) -> Vec<AnomalyRecord> {
        let threshold = self.normalised_threshold();
        bucket
            .records
            .iter()
            .filter(|record| is_greater_or_equal(record.normalized_probability, threshold))
            .map(|record| AnomalyRecord {
                timestamp: Some(bucket.timestamp),
                ..record.clone()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketwatch_core::{BucketInfluencer, Influencer};
    use chrono::{TimeZone, Utc};

    fn bucket(anomaly_score: f64, max_normalized_probability: f64) -> Bucket {
        let mut bucket = Bucket::new("job", Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        bucket.anomaly_score = anomaly_score;
        bucket.max_normalized_probability = max_normalized_probability;
        bucket
    }

    fn record(normalized_probability: f64) -> AnomalyRecord {
        AnomalyRecord {
            normalized_probability,
            ..AnomalyRecord::default()
        }
    }

    #[test]
    fn unset_threshold_never_satisfied() {
        assert!(!is_greater_or_equal(100.0, None));
        assert!(!is_greater_or_equal(f64::INFINITY, None));
        assert!(!is_greater_or_equal(f64::NAN, None));
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(is_greater_or_equal(50.0, Some(50.0)));
        assert!(is_greater_or_equal(50.1, Some(50.0)));
        assert!(!is_greater_or_equal(49.9, Some(50.0)));
    }

    #[test]
    fn bucket_trigger_on_either_threshold() {
        let trigger = AlertTrigger::new(AlertType::Bucket, Some(90.0), Some(75.0));
        assert!(trigger.is_triggered(&bucket(75.0, 0.0)));
        assert!(trigger.is_triggered(&bucket(0.0, 90.0)));
        assert!(!trigger.is_triggered(&bucket(74.9, 89.9)));
    }

    #[test]
    fn unarmed_trigger_never_fires() {
        let trigger = AlertTrigger::new(AlertType::Bucket, None, None);
        assert!(!trigger.is_triggered(&bucket(100.0, 100.0)));
    }

    #[test]
    fn interim_buckets_need_opt_in() {
        let mut interim = bucket(100.0, 100.0);
        interim.is_interim = true;

        let trigger = AlertTrigger::new(AlertType::Bucket, None, Some(50.0));
        assert!(!trigger.is_triggered(&interim));
        assert!(trigger.including_interim(true).is_triggered(&interim));
    }

    #[test]
    fn influencer_triggers_use_anomaly_threshold_only() {
        let mut b = bucket(0.0, 100.0);
        b.influencers.push(Influencer::new("host", "web-01", 60.0));
        b.bucket_influencers.push(BucketInfluencer::new("host", 40.0));

        let influencer = AlertTrigger::new(AlertType::Influencer, Some(10.0), Some(60.0));
        assert!(influencer.is_triggered(&b));

        let bucket_influencer = AlertTrigger::new(AlertType::BucketInfluencer, Some(10.0), Some(60.0));
        assert!(!bucket_influencer.is_triggered(&b));

        let normalised_only = AlertTrigger::new(AlertType::Influencer, Some(10.0), None);
        assert!(!normalised_only.is_triggered(&b));
    }

    #[test]
    fn extract_records_filters_and_stamps() {
        let mut b = bucket(10.0, 95.0);
        b.records = vec![record(95.0), record(50.0), record(80.0)];

        let trigger = AlertTrigger::new(AlertType::Bucket, Some(80.0), None);
        let extracted = trigger.extract_records(&b);

        assert_eq!(extracted.len(), 2);
        assert!(extracted.iter().all(|r| r.timestamp == Some(b.timestamp)));
        assert!(b.records.iter().all(|r| r.timestamp.is_none()));
    }

    #[test]
    fn extract_with_unset_threshold_is_empty() {
        let mut b = bucket(10.0, 95.0);
        b.records = vec![record(95.0)];
        let trigger = AlertTrigger::new(AlertType::Bucket, None, Some(5.0));
        assert!(trigger.extract_records(&b).is_empty());
    }
}
