//! Detection rule checks: rules that can never fire, dangling value list references.

use super::ValidationResult;
use crate::schema::{DetectionRule, RuleConditionType};
use crate::value_list::ValueLists;

pub(super) fn validate_detection_rules(
    rules: &[DetectionRule],
    known_lists: &ValueLists,
    result: &mut ValidationResult,
) {
    for (i, rule) in rules.iter().enumerate() {
        let path = format!("detectionRules[{i}]");

        if rule.rule_conditions().is_empty() {
            result.warn(
                format!("{path}.ruleConditions"),
                "rule has no conditions and will never filter results",
            );
        }

        for (j, condition) in rule.rule_conditions().iter().enumerate() {
            if condition.condition_type() != RuleConditionType::Categorical {
                continue;
            }
            if let Some(list_id) = condition.value_list() {
                if !known_lists.has_list(list_id) {
                    result.warn(
                        format!("{path}.ruleConditions[{j}].valueList"),
                        format!("value list '{list_id}' is not defined; the condition never matches"),
                    );
                }
            }
        }
    }
}
