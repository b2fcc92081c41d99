//! Detection-rule filtering and alert triggering over anomaly results.
//!
//! This crate provides:
//! - Rule and trigger schema types with validated serde deserialization
//! - Detection rule evaluation (`DetectionRule::filter`, [`ResultFilter`])
//! - Alert trigger evaluation and per-job fan-out ([`AlertObserver`], [`AlertSink`])
//! - YAML document validation with suggestions
//! - Filesystem loader with hot-reload via `notify` watcher

pub mod alerting;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod value_list;

pub use alerting::{Alert, AlertObserver, AlertPayload, AlertSink};
pub use error::ConfigError;
pub use evaluator::{FilterOutcome, ResultFilter};
pub use loader::{RuleLoader, RuleSnapshot};
pub use value_list::{ValueListLookup, ValueLists};
