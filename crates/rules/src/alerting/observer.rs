//! Per-job fan-out of a bucket over its alert triggers.

use std::sync::{Arc, RwLock};

use bucketwatch_core::Bucket;
use tracing::{debug, info};

use super::{Alert, AlertSink};
use crate::schema::AlertTrigger;

/// Holds one job's alert triggers and evaluates buckets against them.
///
/// Triggers are an immutable snapshot; [`replace_triggers`](Self::replace_triggers)
/// swaps the whole set so a concurrent evaluation sees either the old or the
/// new one.
pub struct AlertObserver {
    job_id: String,
    triggers: RwLock<Arc<Vec<AlertTrigger>>>,
}

impl AlertObserver {
    pub fn new(job_id: impl Into<String>, triggers: Vec<AlertTrigger>) -> Self {
        Self {
            job_id: job_id.into(),
            triggers: RwLock::new(Arc::new(triggers)),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Current trigger snapshot.
    pub fn triggers(&self) -> Arc<Vec<AlertTrigger>> {
        Arc::clone(&self.triggers.read().expect("triggers lock poisoned"))
    }

    /// Swap in a new trigger set.
    pub fn replace_triggers(&self, triggers: Vec<AlertTrigger>) {
        *self.triggers.write().expect("triggers lock poisoned") = Arc::new(triggers);
        debug!(job_id = %self.job_id, "alert triggers replaced");
    }

    /// True when at least one trigger fires for `bucket`.
    pub fn evaluate(&self, bucket: &Bucket) -> bool {
        self.triggers().iter().any(|t| t.is_triggered(bucket))
    }

    /// Triggers that fire for `bucket`, in configuration order.
    pub fn triggered_alerts(&self, bucket: &Bucket) -> Vec<AlertTrigger> {
        self.triggers()
            .iter()
            .filter(|t| t.is_triggered(bucket))
            .cloned()
            .collect()
    }

    pub fn create_alert(&self, bucket: &Bucket, trigger: &AlertTrigger) -> Alert {
        Alert::build(self.job_id.as_str(), bucket, trigger)
    }

    /// Call `sink` once per fired trigger with the alert built for it by
    /// [`create_alert`](Self::create_alert). Returns the number of calls.
    pub fn observe<S>(&self, bucket: &Bucket, sink: &S) -> usize
    where
        S: AlertSink + ?Sized,
    {
        let snapshot = self.triggers();
        let mut fired = 0;
        for trigger in snapshot.iter().filter(|t| t.is_triggered(bucket)) {
            debug!(
                job_id = %self.job_id,
                alert_type = %trigger.alert_type(),
                anomaly_score = bucket.anomaly_score,
                "alert trigger matched"
            );
            let alert = self.create_alert(bucket, trigger);
            sink.fire_alert(bucket, trigger, &alert);
            fired += 1;
        }
        if fired > 0 {
            info!(
                job_id = %self.job_id,
                timestamp = %bucket.timestamp,
                fired,
                "bucket raised alerts"
            );
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AlertType;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        fired: Mutex<Vec<AlertTrigger>>,
    }

    impl AlertSink for RecordingSink {
        fn fire(&self, _bucket: &Bucket, trigger: &AlertTrigger) {
            self.fired.lock().unwrap().push(trigger.clone());
        }
    }

    fn bucket(anomaly_score: f64) -> Bucket {
        let mut bucket = Bucket::new("job", Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        bucket.anomaly_score = anomaly_score;
        bucket
    }

    fn at(threshold: f64) -> AlertTrigger {
        AlertTrigger::new(AlertType::Bucket, None, Some(threshold))
    }

    #[test]
    fn fires_once_per_trigger_in_order() {
        let observer = AlertObserver::new("job", vec![at(50.0), at(90.0), at(10.0), at(10.0)]);
        let sink = RecordingSink::default();

        let fired = observer.observe(&bucket(60.0), &sink);

        assert_eq!(fired, 3);
        let recorded = sink.fired.lock().unwrap();
        assert_eq!(*recorded, vec![at(50.0), at(10.0), at(10.0)]);
    }

    #[test]
    fn evaluate_and_triggered_alerts_agree() {
        let observer = AlertObserver::new("job", vec![at(50.0), at(90.0)]);
        assert!(observer.evaluate(&bucket(60.0)));
        assert_eq!(observer.triggered_alerts(&bucket(60.0)), vec![at(50.0)]);

        assert!(!observer.evaluate(&bucket(10.0)));
        assert!(observer.triggered_alerts(&bucket(10.0)).is_empty());
    }

    #[test]
    fn no_triggers_never_fires() {
        let observer = AlertObserver::new("job", vec![]);
        let sink = RecordingSink::default();
        assert!(!observer.evaluate(&bucket(100.0)));
        assert_eq!(observer.observe(&bucket(100.0), &sink), 0);
    }

    #[test]
    fn replace_swaps_whole_set() {
        let observer = AlertObserver::new("job", vec![at(50.0)]);
        let before = observer.triggers();

        observer.replace_triggers(vec![at(99.0)]);

        assert_eq!(*before, vec![at(50.0)]);
        assert!(!observer.evaluate(&bucket(60.0)));
    }

    #[test]
    fn sink_may_reenter_observer() {
        struct Reentrant<'a>(&'a AlertObserver);
        impl AlertSink for Reentrant<'_> {
            fn fire(&self, _bucket: &Bucket, _trigger: &AlertTrigger) {
                self.0.replace_triggers(vec![]);
            }
        }

        let observer = AlertObserver::new("job", vec![at(1.0), at(2.0)]);
        // Replacing from inside the sink must not deadlock; the running
        // evaluation keeps its snapshot.
        assert_eq!(observer.observe(&bucket(60.0), &Reentrant(&observer)), 2);
        assert!(observer.triggers().is_empty());
    }

    #[test]
    fn create_alert_is_stamped_with_job() {
        let observer = AlertObserver::new("web-latency", vec![at(50.0)]);
        let alert = observer.create_alert(&bucket(60.0), &at(50.0));
        assert_eq!(alert.job_id, "web-latency");
    }

    #[test]
    fn observe_hands_sink_the_observer_alert() {
        #[derive(Default)]
        struct AlertRecorder {
            alerts: Mutex<Vec<Alert>>,
        }
        impl AlertSink for AlertRecorder {
            fn fire(&self, _bucket: &Bucket, _trigger: &AlertTrigger) {
                panic!("observer must call fire_alert");
            }
            fn fire_alert(&self, _bucket: &Bucket, _trigger: &AlertTrigger, alert: &Alert) {
                self.alerts.lock().unwrap().push(alert.clone());
            }
        }

        // Bucket job id differs; the observer's job id is the one stamped.
        let observer = AlertObserver::new("web-latency", vec![at(50.0)]);
        let sink = AlertRecorder::default();
        observer.observe(&bucket(60.0), &sink);

        let alerts = sink.alerts.lock().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].job_id, "web-latency");
        assert_eq!(alerts[0].anomaly_score, 60.0);
    }
}
