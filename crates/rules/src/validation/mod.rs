//! Document validation with structured errors and suggestions.
//!
//! Construction already rejects malformed rules and conditions; this layer
//! adds document-level checks (header, ids) and advisory warnings for
//! configurations that are valid but cannot do anything useful.
//! Returns a [`ValidationResult`] with errors (block activation) and warnings (advisory).

mod document_checks;
mod rule_checks;
mod trigger_checks;

pub mod fuzzy;

use crate::schema::*;
use crate::value_list::ValueLists;
use serde::{Deserialize, Serialize};

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Path-like location, e.g. `"detectionRules[0].ruleConditions[1]"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: Option<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion,
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Errors joined into one line, for logs and error values.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| {
                if e.path.is_empty() {
                    e.message.clone()
                } else {
                    format!("{}: {}", e.path, e.message)
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a parsed [`JobRules`] document.
///
/// `known_lists` are the value lists categorical conditions may reference.
pub fn validate_job_rules(doc: &JobRules, known_lists: &ValueLists) -> ValidationResult {
    let mut result = ValidationResult::new();
    document_checks::validate_header(&doc.api_version, &doc.metadata, &mut result);
    rule_checks::validate_detection_rules(&doc.detection_rules, known_lists, &mut result);
    trigger_checks::validate_alert_triggers(&doc.alert_triggers, &mut result);
    result
}

/// Validate any [`RuleDocument`] variant, dispatching to the appropriate checks.
pub fn validate_document(doc: &RuleDocument, known_lists: &ValueLists) -> ValidationResult {
    match doc {
        RuleDocument::JobRules(rules) => validate_job_rules(rules, known_lists),
        RuleDocument::ValueList(list) => {
            let mut result = ValidationResult::new();
            document_checks::validate_header(&list.api_version, &list.metadata, &mut result);
            document_checks::validate_value_list(list, &mut result);
            result
        }
    }
}

/// Parse raw YAML and validate. Parse errors are reported as errors, with a
/// suggestion when the failure names an unknown keyword.
pub fn validate_yaml(yaml: &str, known_lists: &ValueLists) -> ValidationResult {
    let parsed = serde_yaml::from_str::<RuleEnvelope>(yaml)
        .map_err(|e| e.to_string())
        .and_then(|envelope| envelope.parse_full());

    match parsed {
        Ok(doc) => validate_document(&doc, known_lists),
        Err(message) => {
            let mut result = ValidationResult::new();
            let suggestion = fuzzy::suggest_for_parse_error(&message);
            result.error_with_suggestion("", format!("YAML parse error: {message}"), suggestion);
            result
        }
    }
}
