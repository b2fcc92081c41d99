//! Alert trigger configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which part of a bucket a trigger inspects. Parsed case-insensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AlertType {
    #[default]
    Bucket,
    Influencer,
    BucketInfluencer,
}

impl AlertType {
    pub const ALL: [AlertType; 3] = [AlertType::Bucket, AlertType::Influencer, AlertType::BucketInfluencer];

    pub fn name(self) -> &'static str {
        match self {
            AlertType::Bucket => "BUCKET",
            AlertType::Influencer => "INFLUENCER",
            AlertType::BucketInfluencer => "BUCKETINFLUENCER",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlertType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlertType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownValue {
                what: "alert type",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for AlertType {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AlertType> for String {
    fn from(t: AlertType) -> Self {
        t.name().to_string()
    }
}

/// Thresholds deciding when a bucket raises an alert.
///
/// A `None` threshold means that channel is not armed and can never fire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AlertTrigger {
    #[serde(default, alias = "normalizedProbabilityThreshold")]
    normalised_threshold: Option<f64>,
    #[serde(default)]
    anomaly_threshold: Option<f64>,
    #[serde(default)]
    alert_type: AlertType,
    #[serde(default)]
    include_interim: bool,
}

impl AlertTrigger {
    pub fn new(
        alert_type: AlertType,
        normalised_threshold: Option<f64>,
        anomaly_threshold: Option<f64>,
    ) -> Self {
        Self {
            normalised_threshold,
            anomaly_threshold,
            alert_type,
            include_interim: false,
        }
    }

    /// Same trigger, also evaluated against interim buckets.
    pub fn including_interim(mut self, include_interim: bool) -> Self {
        self.include_interim = include_interim;
        self
    }

    pub fn normalised_threshold(&self) -> Option<f64> {
        self.normalised_threshold
    }

    pub fn anomaly_threshold(&self) -> Option<f64> {
        self.anomaly_threshold
    }

    pub fn alert_type(&self) -> AlertType {
        self.alert_type
    }

    pub fn include_interim(&self) -> bool {
        self.include_interim
    }
}

impl fmt::Display for AlertTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_threshold = |t: Option<f64>| t.map_or_else(|| "unset".to_string(), |v| v.to_string());
        write!(
            f,
            "{} anomalyScore>={} normalizedProbability>={}{}",
            self.alert_type,
            fmt_threshold(self.anomaly_threshold),
            fmt_threshold(self.normalised_threshold),
            if self.include_interim { " (incl. interim)" } else { "" }
        )
    }
}
