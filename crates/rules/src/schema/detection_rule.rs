//! Detection rules: scoped, connective combinations of rule conditions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::RuleCondition;
use crate::error::ConfigError;

/// What a triggered detection rule does to a record.
///
/// New actions may be added; callers must treat an action they do not
/// handle as "leave the record alone".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum RuleAction {
    /// Drop the record from the results.
    #[default]
    FilterResults,
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleAction::FilterResults => write!(f, "FILTER_RESULTS"),
        }
    }
}

/// How the outcomes of a rule's conditions combine. Parsed case-insensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Connective {
    And,
    #[default]
    Or,
}

impl Connective {
    pub const ALL: [Connective; 2] = [Connective::And, Connective::Or];

    pub fn name(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Connective {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Connective::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownValue {
                what: "connective",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for Connective {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Connective> for String {
    fn from(c: Connective) -> Self {
        c.name().to_string()
    }
}

/// A user-authored rule that suppresses matching anomaly records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DetectionRuleSpec", into = "DetectionRuleSpec")]
pub struct DetectionRule {
    rule_action: RuleAction,
    target_field_name: Option<String>,
    target_field_value: Option<String>,
    conditions_connective: Connective,
    rule_conditions: Vec<RuleCondition>,
}

/// Wire shape of a [`DetectionRule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DetectionRuleSpec {
    #[serde(default)]
    pub rule_action: RuleAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_field_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_field_value: Option<String>,
    #[serde(default)]
    pub conditions_connective: Connective,
    #[serde(default)]
    pub rule_conditions: Vec<RuleCondition>,
}

impl DetectionRule {
    /// An unscoped `FILTER_RESULTS` rule.
    pub fn new(conditions_connective: Connective, rule_conditions: Vec<RuleCondition>) -> Self {
        Self {
            rule_action: RuleAction::FilterResults,
            target_field_name: None,
            target_field_value: None,
            conditions_connective,
            rule_conditions,
        }
    }

    /// Restrict the rule to records carrying `field_name` (with `field_value`, if given).
    pub fn targeting(mut self, field_name: impl Into<String>, field_value: Option<String>) -> Self {
        self.target_field_name = Some(field_name.into());
        self.target_field_value = field_value;
        self
    }

    pub fn rule_action(&self) -> RuleAction {
        self.rule_action
    }

    pub fn target_field_name(&self) -> Option<&str> {
        self.target_field_name.as_deref()
    }

    pub fn target_field_value(&self) -> Option<&str> {
        self.target_field_value.as_deref()
    }

    pub fn conditions_connective(&self) -> Connective {
        self.conditions_connective
    }

    pub fn rule_conditions(&self) -> &[RuleCondition] {
        &self.rule_conditions
    }
}

impl TryFrom<DetectionRuleSpec> for DetectionRule {
    type Error = ConfigError;

    fn try_from(spec: DetectionRuleSpec) -> Result<Self, Self::Error> {
        if spec.target_field_name.is_none() {
            if let Some(value) = &spec.target_field_value {
                return Err(ConfigError::MissingTargetFieldName(value.clone()));
            }
        }
        Ok(Self {
            rule_action: spec.rule_action,
            target_field_name: spec.target_field_name,
            target_field_value: spec.target_field_value,
            conditions_connective: spec.conditions_connective,
            rule_conditions: spec.rule_conditions,
        })
    }
}

impl From<DetectionRule> for DetectionRuleSpec {
    fn from(rule: DetectionRule) -> Self {
        Self {
            rule_action: rule.rule_action,
            target_field_name: rule.target_field_name,
            target_field_value: rule.target_field_value,
            conditions_connective: rule.conditions_connective,
            rule_conditions: rule.rule_conditions,
        }
    }
}

impl fmt::Display for DetectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rule_action)?;
        match (&self.target_field_name, &self.target_field_value) {
            (Some(name), Some(value)) => write!(f, " ({name}:{value})")?,
            (Some(name), None) => write!(f, " ({name})")?,
            _ => {}
        }
        write!(f, " IF")?;
        for (i, condition) in self.rule_conditions.iter().enumerate() {
            if i > 0 {
                write!(f, " {}", self.conditions_connective)?;
            }
            write!(f, " {condition}")?;
        }
        Ok(())
    }
}
