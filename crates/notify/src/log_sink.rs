//! Sink that renders each alert and logs it.

use bucketwatch_core::Bucket;
use bucketwatch_rules::schema::AlertTrigger;
use bucketwatch_rules::{Alert, AlertSink};
use tracing::{info, warn};

use crate::templating::AlertTemplates;

/// Logs every fired alert through `tracing` at info level.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    templates: AlertTemplates,
}

impl LogSink {
    pub fn new(templates: AlertTemplates) -> Self {
        Self { templates }
    }
}

impl AlertSink for LogSink {
    fn fire(&self, bucket: &Bucket, trigger: &AlertTrigger) {
        let alert = Alert::build(bucket.job_id.as_str(), bucket, trigger);
        self.fire_alert(bucket, trigger, &alert);
    }

    fn fire_alert(&self, _bucket: &Bucket, _trigger: &AlertTrigger, alert: &Alert) {
        match self.templates.render(alert) {
            Ok(rendered) => info!(
                alert_id = %alert.id,
                job_id = %alert.job_id,
                alert_type = %alert.alert_type,
                subject = %rendered.subject,
                "{}",
                rendered.body
            ),
            Err(e) => warn!(
                alert_id = %alert.id,
                job_id = %alert.job_id,
                error = %e,
                "failed to render alert"
            ),
        }
    }
}
