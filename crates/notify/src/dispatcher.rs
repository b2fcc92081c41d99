//! Routes fired triggers to per-job sinks.
//!
//! The dispatcher is itself an [`AlertSink`]: each fire is forwarded to
//! every sink configured for the bucket's job, or to the default sinks
//! when the job has none.

use std::collections::HashMap;
use std::sync::Arc;

use bucketwatch_core::Bucket;
use bucketwatch_rules::schema::AlertTrigger;
use bucketwatch_rules::{Alert, AlertSink};

/// Dispatches alerts to multiple sinks, organized per job.
#[derive(Default)]
pub struct Dispatcher {
    /// Job ID → sinks for that job.
    job_sinks: HashMap<String, Vec<Arc<dyn AlertSink>>>,
    /// Fallback sinks used when no job-specific sinks exist.
    default_sinks: Vec<Arc<dyn AlertSink>>,
}

impl Dispatcher {
    /// Create a dispatcher with per-job sink mapping.
    pub fn new(job_sinks: HashMap<String, Vec<Arc<dyn AlertSink>>>) -> Self {
        Self {
            job_sinks,
            default_sinks: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a dispatcher with sinks shared across all jobs.
    pub fn with_defaults(sinks: Vec<Arc<dyn AlertSink>>) -> Self {
        Self {
            job_sinks: HashMap::new(),
            default_sinks: sinks,
        }
    }

    /// Replace all sinks for a specific job.
    pub fn set_job_sinks(&mut self, job_id: String, sinks: Vec<Arc<dyn AlertSink>>) {
        self.job_sinks.insert(job_id, sinks);
    }

    pub fn remove_job(&mut self, job_id: &str) {
        self.job_sinks.remove(job_id);
    }

    fn sinks_for(&self, job_id: &str) -> &[Arc<dyn AlertSink>] {
        self.job_sinks
            .get(job_id)
            .map(Vec::as_slice)
            .unwrap_or(self.default_sinks.as_slice())
    }
}

impl AlertSink for Dispatcher {
    /// Builds the alert once, stamped with the bucket's job id.
    fn fire(&self, bucket: &Bucket, trigger: &AlertTrigger) {
        let alert = Alert::build(bucket.job_id.as_str(), bucket, trigger);
        self.fire_alert(bucket, trigger, &alert);
    }

    /// Forwards the same alert to every sink, so all of them report one id.
    fn fire_alert(&self, bucket: &Bucket, trigger: &AlertTrigger, alert: &Alert) {
        let sinks = self.sinks_for(&alert.job_id);
        if sinks.is_empty() {
            tracing::debug!(job_id = %alert.job_id, "No alert sinks configured");
            return;
        }
        for sink in sinks {
            sink.fire_alert(bucket, trigger, alert);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketwatch_rules::schema::AlertType;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use bucketwatch_rules::AlertObserver;

    use crate::ChannelSink;

    #[derive(Default)]
    struct CountingSink {
        fired: AtomicUsize,
    }

    impl AlertSink for CountingSink {
        fn fire(&self, _bucket: &Bucket, _trigger: &AlertTrigger) {
            self.fired.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn bucket(job_id: &str) -> Bucket {
        Bucket::new(job_id, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    fn trigger() -> AlertTrigger {
        AlertTrigger::new(AlertType::Bucket, None, Some(1.0))
    }

    #[test]
    fn fires_every_job_sink() {
        let a = Arc::new(CountingSink::default());
        let b = Arc::new(CountingSink::default());
        let default = Arc::new(CountingSink::default());

        let mut dispatcher = Dispatcher::with_defaults(vec![default.clone() as Arc<dyn AlertSink>]);
        dispatcher.set_job_sinks(
            "job-1".to_string(),
            vec![a.clone() as Arc<dyn AlertSink>, b.clone() as Arc<dyn AlertSink>],
        );

        dispatcher.fire(&bucket("job-1"), &trigger());

        assert_eq!(a.fired.load(Ordering::SeqCst), 1);
        assert_eq!(b.fired.load(Ordering::SeqCst), 1);
        assert_eq!(default.fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unknown_job_uses_defaults() {
        let default = Arc::new(CountingSink::default());
        let dispatcher = Dispatcher::with_defaults(vec![default.clone() as Arc<dyn AlertSink>]);

        dispatcher.fire(&bucket("other"), &trigger());
        assert_eq!(default.fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removed_job_falls_back() {
        let a = Arc::new(CountingSink::default());
        let mut dispatcher = Dispatcher::empty();
        dispatcher.set_job_sinks("job-1".to_string(), vec![a.clone() as Arc<dyn AlertSink>]);
        dispatcher.remove_job("job-1");

        dispatcher.fire(&bucket("job-1"), &trigger());
        assert_eq!(a.fired.load(Ordering::SeqCst), 0);
    }

    #[derive(Default)]
    struct IdSink {
        ids: Mutex<Vec<uuid::Uuid>>,
    }

    impl AlertSink for IdSink {
        fn fire(&self, _bucket: &Bucket, _trigger: &AlertTrigger) {}

        fn fire_alert(&self, _bucket: &Bucket, _trigger: &AlertTrigger, alert: &Alert) {
            self.ids.lock().unwrap().push(alert.id);
        }
    }

    #[test]
    fn every_sink_sees_the_same_alert() {
        let logged = Arc::new(IdSink::default());
        let (channel, mut rx) = ChannelSink::new();
        let dispatcher = Dispatcher::with_defaults(vec![
            logged.clone() as Arc<dyn AlertSink>,
            Arc::new(channel) as Arc<dyn AlertSink>,
        ]);

        dispatcher.fire(&bucket("job-1"), &trigger());

        let delivered = rx.try_recv().expect("alert delivered");
        assert_eq!(*logged.ids.lock().unwrap(), vec![delivered.id]);
    }

    #[test]
    fn observer_alert_reaches_sinks_unchanged() {
        let logged = Arc::new(IdSink::default());
        let (channel, mut rx) = ChannelSink::new();
        let dispatcher = Dispatcher::with_defaults(vec![
            logged.clone() as Arc<dyn AlertSink>,
            Arc::new(channel) as Arc<dyn AlertSink>,
        ]);
        let observer = AlertObserver::new("web-latency", vec![trigger()]);

        let mut b = bucket("web-latency");
        b.anomaly_score = 10.0;
        assert_eq!(observer.observe(&b, &dispatcher), 1);

        let delivered = rx.try_recv().expect("alert delivered");
        assert_eq!(delivered.job_id, "web-latency");
        assert_eq!(*logged.ids.lock().unwrap(), vec![delivered.id]);
        assert!(rx.try_recv().is_err());
    }
}
