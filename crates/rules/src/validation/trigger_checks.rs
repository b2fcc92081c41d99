//! Alert trigger checks.

use super::ValidationResult;
use crate::schema::{AlertTrigger, AlertType};

const SCORE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=100.0;

pub(super) fn validate_alert_triggers(triggers: &[AlertTrigger], result: &mut ValidationResult) {
    for (i, trigger) in triggers.iter().enumerate() {
        let path = format!("alertTriggers[{i}]");

        if trigger.normalised_threshold().is_none() && trigger.anomaly_threshold().is_none() {
            result.warn(
                path.clone(),
                "neither normalisedThreshold nor anomalyThreshold is set; trigger never fires",
            );
        }

        if trigger.alert_type() != AlertType::Bucket && trigger.normalised_threshold().is_some() {
            result.warn(
                format!("{path}.normalisedThreshold"),
                format!(
                    "normalisedThreshold is ignored for {} triggers",
                    trigger.alert_type()
                ),
            );
        }

        for (field, value) in [
            ("normalisedThreshold", trigger.normalised_threshold()),
            ("anomalyThreshold", trigger.anomaly_threshold()),
        ] {
            if let Some(value) = value {
                if !SCORE_RANGE.contains(&value) {
                    result.warn(
                        format!("{path}.{field}"),
                        format!("{field} {value} is outside the 0-100 score range"),
                    );
                }
            }
        }
    }
}
