//! Typed predicates over a single anomaly record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Condition;
use crate::error::ConfigError;

/// What a [`RuleCondition`] inspects on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RuleConditionType {
    /// Membership of a field value in a named value list.
    Categorical,
    /// The record's actual value.
    NumericalActual,
    /// The record's typical value.
    NumericalTypical,
    /// `|actual - typical|`.
    NumericalDiffAbs,
}

impl RuleConditionType {
    pub const ALL: [RuleConditionType; 4] = [
        RuleConditionType::Categorical,
        RuleConditionType::NumericalActual,
        RuleConditionType::NumericalTypical,
        RuleConditionType::NumericalDiffAbs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuleConditionType::Categorical => "CATEGORICAL",
            RuleConditionType::NumericalActual => "NUMERICAL_ACTUAL",
            RuleConditionType::NumericalTypical => "NUMERICAL_TYPICAL",
            RuleConditionType::NumericalDiffAbs => "NUMERICAL_DIFF_ABS",
        }
    }

    pub fn is_numerical(self) -> bool {
        !matches!(self, RuleConditionType::Categorical)
    }

    fn label(self) -> &'static str {
        match self {
            RuleConditionType::Categorical => "CATEGORICAL",
            RuleConditionType::NumericalActual => "ACTUAL",
            RuleConditionType::NumericalTypical => "TYPICAL",
            RuleConditionType::NumericalDiffAbs => "DIFF_ABS",
        }
    }
}

impl fmt::Display for RuleConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleConditionType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleConditionType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownRuleConditionType(s.to_string()))
    }
}

impl TryFrom<String> for RuleConditionType {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RuleConditionType> for String {
    fn from(t: RuleConditionType) -> Self {
        t.name().to_string()
    }
}

// ── RuleCondition ───────────────────────────────────────────────────

/// One predicate of a detection rule.
///
/// Immutable once built; every constructor (including deserialization)
/// runs the same structural checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleConditionSpec", into = "RuleConditionSpec")]
pub struct RuleCondition {
    condition_type: RuleConditionType,
    field_name: Option<String>,
    field_value: Option<String>,
    condition: Option<Condition>,
    value_list: Option<String>,
}

/// Wire shape of a [`RuleCondition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleConditionSpec {
    pub condition_type: RuleConditionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_list: Option<String>,
}

impl RuleCondition {
    /// `field_name` value must be a member of the list `value_list`.
    pub fn categorical(field_name: impl Into<String>, value_list: impl Into<String>) -> Self {
        Self {
            condition_type: RuleConditionType::Categorical,
            field_name: Some(field_name.into()),
            field_value: None,
            condition: None,
            value_list: Some(value_list.into()),
        }
    }

    /// Numeric test, optionally scoped to records where `field_name`
    /// (equals `field_value`).
    pub fn numerical(
        condition_type: RuleConditionType,
        field_name: Option<String>,
        field_value: Option<String>,
        condition: Condition,
    ) -> Result<Self, ConfigError> {
        Self::try_from(RuleConditionSpec {
            condition_type,
            field_name,
            field_value,
            condition: Some(condition),
            value_list: None,
        })
    }

    pub fn condition_type(&self) -> RuleConditionType {
        self.condition_type
    }

    pub fn field_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    pub fn field_value(&self) -> Option<&str> {
        self.field_value.as_deref()
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    pub fn value_list(&self) -> Option<&str> {
        self.value_list.as_deref()
    }
}

impl TryFrom<RuleConditionSpec> for RuleCondition {
    type Error = ConfigError;

    fn try_from(spec: RuleConditionSpec) -> Result<Self, Self::Error> {
        let type_name = || spec.condition_type.name().to_string();

        if spec.condition_type.is_numerical() {
            let condition = spec.condition.as_ref().ok_or_else(|| ConfigError::MissingCondition {
                condition_type: type_name(),
            })?;
            if !condition.operator().expects_numeric_argument() {
                return Err(ConfigError::NonNumericOperator {
                    condition_type: type_name(),
                    operator: condition.operator().to_string(),
                });
            }
            if spec.value_list.is_some() {
                return Err(ConfigError::UnexpectedField {
                    condition_type: type_name(),
                    field: "valueList",
                });
            }
            if spec.field_name.is_none() {
                if let Some(value) = &spec.field_value {
                    return Err(ConfigError::MissingFieldName(value.clone()));
                }
            }
        } else {
            if spec.field_name.is_none() {
                return Err(ConfigError::MissingCategoricalField("fieldName"));
            }
            if spec.value_list.is_none() {
                return Err(ConfigError::MissingCategoricalField("valueList"));
            }
            if spec.condition.is_some() {
                return Err(ConfigError::UnexpectedField {
                    condition_type: type_name(),
                    field: "condition",
                });
            }
            if spec.field_value.is_some() {
                return Err(ConfigError::UnexpectedField {
                    condition_type: type_name(),
                    field: "fieldValue",
                });
            }
        }

        Ok(Self {
            condition_type: spec.condition_type,
            field_name: spec.field_name,
            field_value: spec.field_value,
            condition: spec.condition,
            value_list: spec.value_list,
        })
    }
}

impl From<RuleCondition> for RuleConditionSpec {
    fn from(rc: RuleCondition) -> Self {
        Self {
            condition_type: rc.condition_type,
            field_name: rc.field_name,
            field_value: rc.field_value,
            condition: rc.condition,
            value_list: rc.value_list,
        }
    }
}

impl fmt::Display for RuleCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.condition_type == RuleConditionType::Categorical {
            return write!(
                f,
                "({}) IN LIST {}",
                self.field_name.as_deref().unwrap_or_default(),
                self.value_list.as_deref().unwrap_or_default()
            );
        }

        f.write_str(self.condition_type.label())?;
        match (&self.field_name, &self.field_value) {
            (Some(name), Some(value)) => write!(f, "({name}:{value})")?,
            (Some(name), None) => write!(f, "({name})")?,
            _ => {}
        }
        if let Some(condition) = &self.condition {
            write!(f, " {condition}")?;
        }
        Ok(())
    }
}
