//! Alerts built for a fired trigger.

use bucketwatch_core::{AnomalyRecord, Bucket};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{AlertTrigger, AlertType};

/// What an alert carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum AlertPayload {
    /// The bucket, for bucket-type alerts restricted to the extracted records.
    Bucket(Bucket),
    /// Extracted records only, without bucket context.
    Records(Vec<AnomalyRecord>),
}

/// One fired alert, owned by the delivery path once handed off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    pub job_id: String,
    /// Timestamp of the bucket that caused the alert.
    pub timestamp: DateTime<Utc>,
    /// Wall-clock time the alert was built.
    pub created_at: DateTime<Utc>,
    pub anomaly_score: f64,
    pub max_normalized_probability: f64,
    pub alert_type: AlertType,
    pub is_interim: bool,
    pub payload: AlertPayload,
}

impl Alert {
    /// Build the alert `trigger` raises for `bucket`.
    ///
    /// Bucket-type triggers attach the bucket (with only the extracted
    /// records) when its anomaly score meets the anomaly threshold, and the
    /// bare extracted records otherwise. Influencer-type triggers always
    /// attach the whole bucket.
    pub fn build(job_id: impl Into<String>, bucket: &Bucket, trigger: &AlertTrigger) -> Self {
        let payload = match trigger.alert_type() {
            AlertType::Bucket => {
                let records = trigger.extract_records(bucket);
                if trigger.triggers_anomaly_threshold(bucket.anomaly_score) {
                    AlertPayload::Bucket(bucket.with_records(records))
                } else {
                    AlertPayload::Records(records)
                }
            }
            AlertType::Influencer | AlertType::BucketInfluencer => {
                AlertPayload::Bucket(bucket.clone())
            }
        };

        Self {
            id: Uuid::new_v4(),
            job_id: job_id.into(),
            timestamp: bucket.timestamp,
            created_at: Utc::now(),
            anomaly_score: bucket.anomaly_score,
            max_normalized_probability: bucket.max_normalized_probability,
            alert_type: trigger.alert_type(),
            is_interim: bucket.is_interim,
            payload,
        }
    }

    pub fn bucket(&self) -> Option<&Bucket> {
        match &self.payload {
            AlertPayload::Bucket(bucket) => Some(bucket),
            AlertPayload::Records(_) => None,
        }
    }

    /// Records relevant to this alert, from whichever payload it carries.
    pub fn records(&self) -> &[AnomalyRecord] {
        match &self.payload {
            AlertPayload::Bucket(bucket) => &bucket.records,
            AlertPayload::Records(records) => records,
        }
    }
}
