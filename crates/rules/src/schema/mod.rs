//! Rule and trigger schema types with serde deserialization.
//!
//! Defines the type hierarchy for configuration documents:
//! - `Operator`, `Condition`, `RuleCondition`, `DetectionRule`: result filtering
//! - `AlertTrigger`: alert thresholds
//! - `RuleEnvelope`: lightweight first-pass header (apiVersion, kind, metadata)
//! - `RuleDocument`: enum dispatching to `JobRules` or `ValueListDocument`
//!
//! Every type validates its structure on deserialization, so a value that
//! exists is always well-formed.

mod alert_trigger;
mod condition;
mod detection_rule;
mod document;
mod envelope;
mod job;
mod kind;
mod metadata;
mod operator;
mod rule_condition;

pub use alert_trigger::*;
pub use condition::*;
pub use detection_rule::*;
pub use document::*;
pub use envelope::*;
pub use job::*;
pub use kind::*;
pub use metadata::*;
pub use operator::*;
pub use rule_condition::*;
