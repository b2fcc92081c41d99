//! Delivery boundary for fired triggers.

use bucketwatch_core::Bucket;

use super::Alert;
use crate::schema::AlertTrigger;

/// Receives one call per trigger that fired.
///
/// Called without any observer lock held. Implementations decide whether
/// delivery happens inline or is handed off elsewhere.
///
/// [`AlertObserver`](super::AlertObserver) calls [`fire_alert`](Self::fire_alert)
/// with the alert it built for the fire, so every sink that forwards it sees
/// the same alert id. Sinks that only need the bucket and trigger implement
/// `fire` and keep the default.
pub trait AlertSink: Send + Sync {
    fn fire(&self, bucket: &Bucket, trigger: &AlertTrigger);

    fn fire_alert(&self, bucket: &Bucket, trigger: &AlertTrigger, _alert: &Alert) {
        self.fire(bucket, trigger)
    }
}

impl<T: AlertSink + ?Sized> AlertSink for std::sync::Arc<T> {
    fn fire(&self, bucket: &Bucket, trigger: &AlertTrigger) {
        (**self).fire(bucket, trigger)
    }

    fn fire_alert(&self, bucket: &Bucket, trigger: &AlertTrigger, alert: &Alert) {
        (**self).fire_alert(bucket, trigger, alert)
    }
}

impl<T: AlertSink + ?Sized> AlertSink for Box<T> {
    fn fire(&self, bucket: &Bucket, trigger: &AlertTrigger) {
        (**self).fire(bucket, trigger)
    }

    fn fire_alert(&self, bucket: &Bucket, trigger: &AlertTrigger, alert: &Alert) {
        (**self).fire_alert(bucket, trigger, alert)
    }
}
