use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AnomalyRecord, BucketInfluencer, Influencer};

/// One time slice of analysis results for a job.
///
/// `anomaly_score` and `max_normalized_probability` are aggregates computed
/// upstream over `records`; nothing here recomputes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub job_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub bucket_span: u64,
    #[serde(default)]
    pub anomaly_score: f64,
    #[serde(default)]
    pub max_normalized_probability: f64,
    #[serde(default)]
    pub is_interim: bool,
    #[serde(default)]
    pub record_count: usize,
    #[serde(default)]
    pub event_count: u64,
    #[serde(default)]
    pub records: Vec<AnomalyRecord>,
    #[serde(default)]
    pub influencers: Vec<Influencer>,
    #[serde(default)]
    pub bucket_influencers: Vec<BucketInfluencer>,
}

impl Bucket {
    /// An empty bucket for `job_id` at `timestamp`.
    pub fn new(job_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            job_id: job_id.into(),
            timestamp,
            bucket_span: 0,
            anomaly_score: 0.0,
            max_normalized_probability: 0.0,
            is_interim: false,
            record_count: 0,
            event_count: 0,
            records: Vec::new(),
            influencers: Vec::new(),
            bucket_influencers: Vec::new(),
        }
    }

    /// Derive a copy of this bucket carrying `records` instead of its own,
    /// with `record_count` kept in step. Scores are copied verbatim.
    pub fn with_records(&self, records: Vec<AnomalyRecord>) -> Self {
        Self {
            job_id: self.job_id.clone(),
            timestamp: self.timestamp,
            bucket_span: self.bucket_span,
            anomaly_score: self.anomaly_score,
            max_normalized_probability: self.max_normalized_probability,
            is_interim: self.is_interim,
            record_count: records.len(),
            event_count: self.event_count,
            records,
            influencers: self.influencers.clone(),
            bucket_influencers: self.bucket_influencers.clone(),
        }
    }
}
