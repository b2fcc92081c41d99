use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Influencer;

/// One detected anomaly within a bucket.
///
/// Records carry no timestamp of their own while they sit inside a bucket;
/// `timestamp` is only stamped when a record is extracted into an alert.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AnomalyRecord {
    pub detector_index: u32,
    pub timestamp: Option<DateTime<Utc>>,
    pub is_interim: bool,
    pub probability: f64,
    pub normalized_probability: f64,
    pub initial_normalized_probability: f64,
    pub anomaly_score: f64,
    pub function: Option<String>,
    pub function_description: Option<String>,
    pub field_name: Option<String>,
    pub by_field_name: Option<String>,
    pub by_field_value: Option<String>,
    pub correlated_by_field_value: Option<String>,
    pub over_field_name: Option<String>,
    pub over_field_value: Option<String>,
    pub partition_field_name: Option<String>,
    pub partition_field_value: Option<String>,
    pub typical: Vec<f64>,
    pub actual: Vec<f64>,
    pub causes: Vec<AnomalyCause>,
    pub influencers: Vec<Influencer>,
}

impl AnomalyRecord {
    /// Look up the value of a by/over/partition field by its field name.
    pub fn field_value(&self, name: &str) -> Option<&str> {
        lookup_field(
            name,
            [
                (&self.by_field_name, &self.by_field_value),
                (&self.over_field_name, &self.over_field_value),
                (&self.partition_field_name, &self.partition_field_value),
            ],
        )
    }

    /// First actual value, if the model reported one.
    pub fn actual_value(&self) -> Option<f64> {
        self.actual.first().copied()
    }

    /// First typical value, if the model reported one.
    pub fn typical_value(&self) -> Option<f64> {
        self.typical.first().copied()
    }
}

/// A population-analysis cause attached to an over-field record.
///
/// Shaped like [`AnomalyRecord`] minus scores and without nested causes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AnomalyCause {
    pub probability: f64,
    pub function: Option<String>,
    pub function_description: Option<String>,
    pub field_name: Option<String>,
    pub by_field_name: Option<String>,
    pub by_field_value: Option<String>,
    pub correlated_by_field_value: Option<String>,
    pub over_field_name: Option<String>,
    pub over_field_value: Option<String>,
    pub partition_field_name: Option<String>,
    pub partition_field_value: Option<String>,
    pub typical: Vec<f64>,
    pub actual: Vec<f64>,
    pub influencers: Vec<Influencer>,
}

impl AnomalyCause {
    /// Look up the value of a by/over/partition field by its field name.
    pub fn field_value(&self, name: &str) -> Option<&str> {
        lookup_field(
            name,
            [
                (&self.by_field_name, &self.by_field_value),
                (&self.over_field_name, &self.over_field_value),
                (&self.partition_field_name, &self.partition_field_value),
            ],
        )
    }
}

fn lookup_field<'a>(
    name: &str,
    pairs: [(&'a Option<String>, &'a Option<String>); 3],
) -> Option<&'a str> {
    pairs
        .into_iter()
        .find(|(field, _)| field.as_deref() == Some(name))
        .and_then(|(_, value)| value.as_deref())
}
