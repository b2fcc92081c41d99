//! Configuration errors raised while constructing rules and conditions.
//!
//! These surface when a rule is built or deserialized; evaluation itself
//! never fails.

/// A rule, condition or operator that cannot be constructed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("unknown rule condition type '{0}'")]
    UnknownRuleConditionType(String),

    #[error("condition has no operator")]
    InvalidOperator,

    #[error("invalid value '{value}' for operator {operator}: {reason}")]
    InvalidConditionValue {
        operator: String,
        value: String,
        reason: String,
    },

    #[error("{condition_type} condition requires a numeric operator, got {operator}")]
    NonNumericOperator {
        condition_type: String,
        operator: String,
    },

    #[error("{condition_type} condition requires a 'condition'")]
    MissingCondition { condition_type: String },

    #[error("{condition_type} condition must not set '{field}'")]
    UnexpectedField {
        condition_type: String,
        field: &'static str,
    },

    #[error("categorical condition requires '{0}'")]
    MissingCategoricalField(&'static str),

    #[error("fieldValue '{0}' is set but fieldName is missing")]
    MissingFieldName(String),

    #[error("targetFieldValue '{0}' is set but targetFieldName is missing")]
    MissingTargetFieldName(String),

    #[error("unknown {what} '{value}'")]
    UnknownValue { what: &'static str, value: String },
}

/// Result alias for rule construction.
pub type Result<T> = std::result::Result<T, ConfigError>;
