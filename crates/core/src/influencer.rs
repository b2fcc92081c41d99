use serde::{Deserialize, Serialize};

/// A field value whose presence correlates with anomalous behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Influencer {
    pub influencer_field_name: String,
    pub influencer_field_value: String,
    #[serde(default)]
    pub probability: f64,
    #[serde(default)]
    pub initial_anomaly_score: f64,
    pub anomaly_score: f64,
}

impl Influencer {
    pub fn new(field_name: impl Into<String>, field_value: impl Into<String>, anomaly_score: f64) -> Self {
        Self {
            influencer_field_name: field_name.into(),
            influencer_field_value: field_value.into(),
            probability: 0.0,
            initial_anomaly_score: anomaly_score,
            anomaly_score,
        }
    }
}

/// Influence of a whole field (not one of its values) over a bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BucketInfluencer {
    pub influencer_field_name: String,
    #[serde(default)]
    pub probability: f64,
    #[serde(default)]
    pub raw_anomaly_score: f64,
    #[serde(default)]
    pub initial_anomaly_score: f64,
    pub anomaly_score: f64,
}

impl BucketInfluencer {
    pub fn new(field_name: impl Into<String>, anomaly_score: f64) -> Self {
        Self {
            influencer_field_name: field_name.into(),
            probability: 0.0,
            raw_anomaly_score: 0.0,
            initial_anomaly_score: anomaly_score,
            anomaly_score,
        }
    }
}
