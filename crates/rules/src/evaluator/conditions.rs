//! Per-record evaluation of a single rule condition.

use bucketwatch_core::AnomalyRecord;

use crate::schema::{RuleCondition, RuleConditionType};
use crate::value_list::ValueListLookup;

impl RuleCondition {
    /// Whether this condition holds for `record`.
    ///
    /// A field the record does not carry, or a numeric value it does not
    /// report, makes the condition false.
    pub fn is_satisfied<L>(&self, record: &AnomalyRecord, lists: &L) -> bool
    where
        L: ValueListLookup + ?Sized,
    {
        match self.condition_type() {
            RuleConditionType::Categorical => self.is_categorical_match(record, lists),
            RuleConditionType::NumericalActual => {
                self.in_scope(record) && self.test_numeric(record.actual_value())
            }
            RuleConditionType::NumericalTypical => {
                self.in_scope(record) && self.test_numeric(record.typical_value())
            }
            RuleConditionType::NumericalDiffAbs => {
                let diff = record
                    .actual_value()
                    .zip(record.typical_value())
                    .map(|(actual, typical)| (actual - typical).abs());
                self.in_scope(record) && self.test_numeric(diff)
            }
        }
    }

    fn is_categorical_match<L>(&self, record: &AnomalyRecord, lists: &L) -> bool
    where
        L: ValueListLookup + ?Sized,
    {
        let (Some(field_name), Some(list_id)) = (self.field_name(), self.value_list()) else {
            return false;
        };
        record
            .field_value(field_name)
            .is_some_and(|value| lists.contains(list_id, value))
    }

    /// `fieldName`/`fieldValue` scoping for numerical conditions.
    fn in_scope(&self, record: &AnomalyRecord) -> bool {
        let Some(field_name) = self.field_name() else {
            return true;
        };
        match (record.field_value(field_name), self.field_value()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
        }
    }

    fn test_numeric(&self, value: Option<f64>) -> bool {
        match (value, self.condition()) {
            (Some(value), Some(condition)) => condition.test(value),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Condition, Operator};
    use crate::value_list::{NoValueLists, ValueLists};

    fn record(actual: f64, typical: f64) -> AnomalyRecord {
        AnomalyRecord {
            actual: vec![actual],
            typical: vec![typical],
            by_field_name: Some("metric".to_string()),
            by_field_value: Some("cpu".to_string()),
            partition_field_name: Some("host".to_string()),
            partition_field_value: Some("web-01".to_string()),
            ..AnomalyRecord::default()
        }
    }

    fn numerical(
        condition_type: RuleConditionType,
        field: Option<(&str, Option<&str>)>,
        op: Operator,
        value: &str,
    ) -> RuleCondition {
        RuleCondition::numerical(
            condition_type,
            field.map(|(name, _)| name.to_string()),
            field.and_then(|(_, value)| value.map(str::to_string)),
            Condition::new(op, value).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn actual_typical_and_diff() {
        let r = record(10.0, 4.0);
        let lists = NoValueLists;

        let actual = numerical(RuleConditionType::NumericalActual, None, Operator::Gt, "9");
        let typical = numerical(RuleConditionType::NumericalTypical, None, Operator::Eq, "4");
        let diff = numerical(RuleConditionType::NumericalDiffAbs, None, Operator::Gte, "6");
        let diff_strict = numerical(RuleConditionType::NumericalDiffAbs, None, Operator::Gt, "6");

        assert!(actual.is_satisfied(&r, &lists));
        assert!(typical.is_satisfied(&r, &lists));
        assert!(diff.is_satisfied(&r, &lists));
        assert!(!diff_strict.is_satisfied(&r, &lists));
    }

    #[test]
    fn diff_is_absolute() {
        let r = record(1.0, 4.0);
        let diff = numerical(RuleConditionType::NumericalDiffAbs, None, Operator::Eq, "3");
        assert!(diff.is_satisfied(&r, &NoValueLists));
    }

    #[test]
    fn missing_values_are_false() {
        let r = AnomalyRecord::default();
        for condition_type in [
            RuleConditionType::NumericalActual,
            RuleConditionType::NumericalTypical,
            RuleConditionType::NumericalDiffAbs,
        ] {
            let condition = numerical(condition_type, None, Operator::Gte, "-1e300");
            assert!(!condition.is_satisfied(&r, &NoValueLists), "{condition_type}");
        }
    }

    #[test]
    fn field_scoping() {
        let r = record(10.0, 4.0);
        let lists = NoValueLists;

        let scoped = numerical(
            RuleConditionType::NumericalActual,
            Some(("metric", Some("cpu"))),
            Operator::Gt,
            "1",
        );
        let other_value = numerical(
            RuleConditionType::NumericalActual,
            Some(("metric", Some("mem"))),
            Operator::Gt,
            "1",
        );
        let name_only = numerical(
            RuleConditionType::NumericalActual,
            Some(("host", None)),
            Operator::Gt,
            "1",
        );
        let unknown_field = numerical(
            RuleConditionType::NumericalActual,
            Some(("region", None)),
            Operator::Gt,
            "1",
        );

        assert!(scoped.is_satisfied(&r, &lists));
        assert!(!other_value.is_satisfied(&r, &lists));
        assert!(name_only.is_satisfied(&r, &lists));
        assert!(!unknown_field.is_satisfied(&r, &lists));
    }

    #[test]
    fn categorical_membership() {
        let r = record(10.0, 4.0);
        let mut lists = ValueLists::new();
        lists.insert("quiet-hosts", ["web-01"]);

        assert!(RuleCondition::categorical("host", "quiet-hosts").is_satisfied(&r, &lists));
        assert!(!RuleCondition::categorical("metric", "quiet-hosts").is_satisfied(&r, &lists));
        assert!(!RuleCondition::categorical("host", "unknown").is_satisfied(&r, &lists));
        assert!(!RuleCondition::categorical("region", "quiet-hosts").is_satisfied(&r, &lists));
    }
}
