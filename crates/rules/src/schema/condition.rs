//! An operator paired with its threshold.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use super::Operator;
use crate::error::ConfigError;

/// Operator plus string-encoded argument, validated on construction.
///
/// Numeric operators parse `value` as `f64` once; `Match` compiles it into
/// an anchored regex once. Equality compares operator and raw value only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ConditionSpec", into = "ConditionSpec")]
pub struct Condition {
    operator: Operator,
    value: String,
    threshold: Option<f64>,
    pattern: Option<Regex>,
}

/// Wire shape of a [`Condition`]: `{operator, value}`, both optional so that
/// a missing operator is reported as [`ConfigError::InvalidOperator`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConditionSpec {
    #[serde(default)]
    pub operator: Option<Operator>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub value: Option<String>,
}

/// Accept `value: "5"` as well as a bare YAML/JSON number `value: 5`.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Integer(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    }))
}

impl Condition {
    pub fn new(operator: Operator, value: impl Into<String>) -> Result<Self, ConfigError> {
        Self::try_from(ConditionSpec {
            operator: Some(operator),
            value: Some(value.into()),
        })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Parsed numeric threshold; `None` for `Match`.
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    /// `lhs <op> threshold`. False for `Match`.
    pub fn test(&self, lhs: f64) -> bool {
        self.threshold
            .is_some_and(|threshold| self.operator.test(lhs, threshold))
    }

    /// Whole-string regex match of `field`. False for numeric operators.
    pub fn matches(&self, field: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|pattern| self.operator.matches(pattern, field))
    }
}

impl TryFrom<ConditionSpec> for Condition {
    type Error = ConfigError;

    fn try_from(spec: ConditionSpec) -> Result<Self, Self::Error> {
        let operator = spec.operator.ok_or(ConfigError::InvalidOperator)?;
        let value = spec.value.unwrap_or_default();
        let invalid = |reason: String| ConfigError::InvalidConditionValue {
            operator: operator.to_string(),
            value: value.clone(),
            reason,
        };

        let (threshold, pattern) = if operator.expects_numeric_argument() {
            let text = value.trim();
            let threshold = text.parse::<f64>().map_err(|e| invalid(e.to_string()))?;
            if !is_accepted_spelling(text, threshold) {
                return Err(invalid(
                    "non-finite threshold must be written Infinity or NaN".to_string(),
                ));
            }
            (Some(threshold), None)
        } else {
            let pattern = Operator::compile_pattern(&value).map_err(|e| invalid(e.to_string()))?;
            (None, Some(pattern))
        };

        Ok(Self {
            operator,
            value,
            threshold,
            pattern,
        })
    }
}

/// `f64::from_str` also takes `inf`, `infinity` and `nan` in any case; only
/// the exact `Infinity` and `NaN` spellings (optionally signed) are allowed.
/// Overflowing literals such as `1e400` stay accepted as infinity.
fn is_accepted_spelling(text: &str, threshold: f64) -> bool {
    if threshold.is_finite() {
        return true;
    }
    let unsigned = text.trim_start_matches(['+', '-']);
    !unsigned.starts_with(|c: char| c.is_ascii_alphabetic()) || matches!(unsigned, "Infinity" | "NaN")
}

impl From<Condition> for ConditionSpec {
    fn from(condition: Condition) -> Self {
        Self {
            operator: Some(condition.operator),
            value: Some(condition.value),
        }
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator && self.value == other.value
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.threshold {
            Some(threshold) => write!(f, "{} {:.6}", self.operator.symbol(), threshold),
            None => write!(f, "{} {}", self.operator.symbol(), self.value),
        }
    }
}
