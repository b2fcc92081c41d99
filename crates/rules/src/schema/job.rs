//! Document kinds: per-job rule sets and named value lists.

use serde::{Deserialize, Serialize};

use super::{AlertTrigger, CommonMetadata, DetectionRule};

/// Detection rules and alert triggers configured for one job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobRules {
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    #[serde(default)]
    pub detection_rules: Vec<DetectionRule>,
    #[serde(default)]
    pub alert_triggers: Vec<AlertTrigger>,
}

impl JobRules {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: "JobRules".to_string(),
            metadata: CommonMetadata::new(job_id),
            detection_rules: Vec::new(),
            alert_triggers: Vec::new(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.metadata.id
    }

    /// Ids of the value lists this job's categorical conditions read.
    pub fn value_list_ids(&self) -> impl Iterator<Item = &str> {
        self.detection_rules
            .iter()
            .flat_map(|rule| rule.rule_conditions())
            .filter_map(|condition| condition.value_list())
    }
}

/// Named set of accepted strings for categorical conditions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValueListDocument {
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    #[serde(default)]
    pub items: Vec<String>,
}
