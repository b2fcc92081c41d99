//! Scope, connective and action handling for detection rules.

use bucketwatch_core::AnomalyRecord;

use crate::schema::{Connective, DetectionRule, RuleAction};
use crate::value_list::ValueListLookup;

impl DetectionRule {
    /// Whether `record` falls within the rule's target scope.
    ///
    /// Unscoped rules apply to every record. A target field the record
    /// does not carry means the rule does not apply.
    pub fn applies_to(&self, record: &AnomalyRecord) -> bool {
        let Some(target_name) = self.target_field_name() else {
            return true;
        };
        match (record.field_value(target_name), self.target_field_value()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
        }
    }

    /// Combine the conditions with the rule's connective. A rule without
    /// conditions never triggers.
    pub fn is_triggered_by<L>(&self, record: &AnomalyRecord, lists: &L) -> bool
    where
        L: ValueListLookup + ?Sized,
    {
        let conditions = self.rule_conditions();
        if conditions.is_empty() {
            return false;
        }
        match self.conditions_connective() {
            Connective::And => conditions.iter().all(|c| c.is_satisfied(record, lists)),
            Connective::Or => conditions.iter().any(|c| c.is_satisfied(record, lists)),
        }
    }

    /// True when the rule suppresses `record`.
    pub fn filter<L>(&self, record: &AnomalyRecord, lists: &L) -> bool
    where
        L: ValueListLookup + ?Sized,
    {
        match self.rule_action() {
            RuleAction::FilterResults => {
                self.applies_to(record) && self.is_triggered_by(record, lists)
            }
            #[allow(unreachable_patterns)]
            other => {
                tracing::debug!(action = %other, "unhandled rule action, keeping record");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Condition, Operator, RuleCondition, RuleConditionType};
    use crate::value_list::NoValueLists;

    fn actual(op: Operator, value: &str) -> RuleCondition {
        RuleCondition::numerical(
            RuleConditionType::NumericalActual,
            None,
            None,
            Condition::new(op, value).unwrap(),
        )
        .unwrap()
    }

    fn record(actual: f64) -> AnomalyRecord {
        AnomalyRecord {
            actual: vec![actual],
            typical: vec![0.0],
            partition_field_name: Some("host".to_string()),
            partition_field_value: Some("web-01".to_string()),
            ..AnomalyRecord::default()
        }
    }

    #[test]
    fn empty_rule_never_filters() {
        let rule = DetectionRule::new(Connective::Or, vec![]);
        assert!(!rule.is_triggered_by(&record(1.0), &NoValueLists));
        assert!(!rule.filter(&record(1.0), &NoValueLists));

        let rule = DetectionRule::new(Connective::And, vec![]);
        assert!(!rule.filter(&record(1.0), &NoValueLists));
    }

    #[test]
    fn or_needs_one_condition() {
        let rule = DetectionRule::new(
            Connective::Or,
            vec![actual(Operator::Lt, "1"), actual(Operator::Gt, "100")],
        );
        assert!(rule.filter(&record(0.5), &NoValueLists));
        assert!(rule.filter(&record(101.0), &NoValueLists));
        assert!(!rule.filter(&record(50.0), &NoValueLists));
    }

    #[test]
    fn and_needs_every_condition() {
        let rule = DetectionRule::new(
            Connective::And,
            vec![actual(Operator::Gt, "1"), actual(Operator::Lt, "10")],
        );
        assert!(rule.filter(&record(5.0), &NoValueLists));
        assert!(!rule.filter(&record(10.0), &NoValueLists));
        assert!(!rule.filter(&record(1.0), &NoValueLists));
    }

    #[test]
    fn target_scope() {
        let base = DetectionRule::new(Connective::Or, vec![actual(Operator::Lt, "5")]);
        let r = record(1.0);

        assert!(base.applies_to(&r));
        assert!(base.clone().targeting("host", None).applies_to(&r));
        assert!(base
            .clone()
            .targeting("host", Some("web-01".to_string()))
            .filter(&r, &NoValueLists));
        assert!(!base
            .clone()
            .targeting("host", Some("web-02".to_string()))
            .filter(&r, &NoValueLists));
        assert!(!base.targeting("region", None).filter(&r, &NoValueLists));
    }
}
