//! Document kind enum for two-pass deserialization dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported document kinds for two-pass deserialization dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    JobRules,
    ValueList,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::JobRules => write!(f, "JobRules"),
            RuleKind::ValueList => write!(f, "ValueList"),
        }
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "JobRules" => Ok(RuleKind::JobRules),
            "ValueList" => Ok(RuleKind::ValueList),
            other => Err(format!("unknown document kind: '{}'", other)),
        }
    }
}
