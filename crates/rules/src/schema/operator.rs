//! Comparison operators used by rule conditions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Comparison primitive applied by a [`Condition`](super::Condition).
///
/// Numeric operators compare with [`compare`]; `Match` tests a string
/// against a regular expression that must match the whole value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    Match,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Eq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Match,
    ];

    /// Upper-case configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Operator::Eq => "EQ",
            Operator::Gt => "GT",
            Operator::Gte => "GTE",
            Operator::Lt => "LT",
            Operator::Lte => "LTE",
            Operator::Match => "MATCH",
        }
    }

    /// Infix symbol used when printing a rule.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Match => "MATCH",
        }
    }

    pub fn expects_numeric_argument(self) -> bool {
        !matches!(self, Operator::Match)
    }

    /// Numeric comparison `lhs <op> rhs`. Always false for `Match`.
    pub fn test(self, lhs: f64, rhs: f64) -> bool {
        let ord = compare(lhs, rhs);
        match self {
            Operator::Eq => ord == Ordering::Equal,
            Operator::Gt => ord == Ordering::Greater,
            Operator::Gte => ord != Ordering::Less,
            Operator::Lt => ord == Ordering::Less,
            Operator::Lte => ord != Ordering::Greater,
            Operator::Match => false,
        }
    }

    /// Whole-string regex match. Always false for numeric operators.
    ///
    /// `pattern` must come from [`Operator::compile_pattern`], which anchors it.
    pub fn matches(self, pattern: &Regex, field: &str) -> bool {
        match self {
            Operator::Match => pattern.is_match(field),
            _ => false,
        }
    }

    /// Compile `pattern` anchored at both ends so only full matches succeed.
    pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
        Regex::new(&format!("^(?:{pattern})$"))
    }
}

/// Three-way comparison of two doubles.
///
/// NaN orders above every other value and equals itself; `-0.0` orders
/// below `+0.0`. Every other pair compares numerically.
pub fn compare(lhs: f64, rhs: f64) -> Ordering {
    match (lhs.is_nan(), rhs.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => lhs.total_cmp(&rhs),
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownOperator(s.to_string()))
    }
}

impl TryFrom<String> for Operator {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.name().to_string()
    }
}
