//! Multi-kind rule document container and accessors.

use super::{CommonMetadata, JobRules, RuleKind, ValueListDocument};

/// A fully deserialized document of any supported kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleDocument {
    /// Detection rules and alert triggers for one job.
    JobRules(JobRules),
    /// Named list of strings referenced by categorical conditions.
    ValueList(ValueListDocument),
}

impl RuleDocument {
    /// Get the document's metadata regardless of kind.
    pub fn metadata(&self) -> &CommonMetadata {
        match self {
            RuleDocument::JobRules(doc) => &doc.metadata,
            RuleDocument::ValueList(doc) => &doc.metadata,
        }
    }

    pub fn api_version(&self) -> &str {
        match self {
            RuleDocument::JobRules(doc) => &doc.api_version,
            RuleDocument::ValueList(doc) => &doc.api_version,
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            RuleDocument::JobRules(_) => RuleKind::JobRules,
            RuleDocument::ValueList(_) => RuleKind::ValueList,
        }
    }

    pub fn as_job_rules(&self) -> Option<&JobRules> {
        match self {
            RuleDocument::JobRules(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_value_list(&self) -> Option<&ValueListDocument> {
        match self {
            RuleDocument::ValueList(doc) => Some(doc),
            _ => None,
        }
    }

    /// Serialize this document to JSON, delegating to the inner type.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            RuleDocument::JobRules(doc) => serde_json::to_value(doc),
            RuleDocument::ValueList(doc) => serde_json::to_value(doc),
        }
    }

    /// Serialize this document to YAML, delegating to the inner type.
    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        match self {
            RuleDocument::JobRules(doc) => serde_yaml::to_string(doc),
            RuleDocument::ValueList(doc) => serde_yaml::to_string(doc),
        }
    }
}
