//! Sink that hands alerts to an async consumer.

use bucketwatch_core::Bucket;
use bucketwatch_rules::schema::AlertTrigger;
use bucketwatch_rules::{Alert, AlertSink};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

use crate::error::NotifyError;

/// Builds the [`Alert`] for each fire and pushes it onto an unbounded channel.
///
/// Never blocks the evaluating thread.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<Alert>,
}

impl ChannelSink {
    /// A sink plus the receiver delivery should drain.
    pub fn new() -> (Self, UnboundedReceiver<Alert>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, alert: Alert) -> Result<(), NotifyError> {
        self.tx.send(alert).map_err(|_| NotifyError::ChannelClosed)
    }
}

impl AlertSink for ChannelSink {
    fn fire(&self, bucket: &Bucket, trigger: &AlertTrigger) {
        let alert = Alert::build(bucket.job_id.as_str(), bucket, trigger);
        self.fire_alert(bucket, trigger, &alert);
    }

    fn fire_alert(&self, _bucket: &Bucket, _trigger: &AlertTrigger, alert: &Alert) {
        if let Err(e) = self.send(alert.clone()) {
            warn!(alert_id = %alert.id, job_id = %alert.job_id, error = %e, "dropping alert");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketwatch_rules::schema::AlertType;
    use chrono::{TimeZone, Utc};

    fn bucket() -> Bucket {
        let mut bucket = Bucket::new("job", Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        bucket.anomaly_score = 90.0;
        bucket
    }

    #[tokio::test]
    async fn fire_enqueues_alert() {
        let (sink, mut rx) = ChannelSink::new();
        let trigger = AlertTrigger::new(AlertType::Bucket, None, Some(50.0));

        sink.fire(&bucket(), &trigger);
        drop(sink);

        let alert = rx.recv().await.expect("alert");
        assert_eq!(alert.job_id, "job");
        assert_eq!(alert.anomaly_score, 90.0);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn closed_receiver_reports_error() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);

        let trigger = AlertTrigger::new(AlertType::Bucket, None, Some(50.0));
        let err = sink
            .send(Alert::build("job", &bucket(), &trigger))
            .unwrap_err();
        assert!(matches!(err, NotifyError::ChannelClosed));
        // Firing into a closed channel only logs.
        sink.fire(&bucket(), &trigger);
    }
}
