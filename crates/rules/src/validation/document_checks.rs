//! Header checks shared by every document kind, plus value list contents.

use std::collections::HashSet;

use super::ValidationResult;
use crate::schema::{CommonMetadata, ValueListDocument};

pub(super) fn validate_header(
    api_version: &str,
    metadata: &CommonMetadata,
    result: &mut ValidationResult,
) {
    if api_version != "v1" {
        result.error(
            "apiVersion",
            format!("apiVersion must be 'v1', got '{api_version}'"),
        );
    }

    if metadata.id.trim().is_empty() {
        result.error("metadata.id", "id must not be empty");
    }
}

pub(super) fn validate_value_list(list: &ValueListDocument, result: &mut ValidationResult) {
    if list.items.is_empty() {
        result.warn("items", "value list is empty; categorical conditions using it never match");
        return;
    }

    let mut seen = HashSet::new();
    for (i, item) in list.items.iter().enumerate() {
        if !seen.insert(item.as_str()) {
            result.warn(format!("items[{i}]"), format!("duplicate item '{item}'"));
        }
    }
}
