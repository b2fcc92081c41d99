//! Asynchronous delivery of alerts drained from a [`ChannelSink`](crate::ChannelSink).
//!
//! Delivery channels implement [`AlertDelivery`]; [`run_delivery`] drains the
//! alert receiver and hands every alert to every channel. Individual channel
//! failures don't block other channels.

use std::time::Instant;

use async_trait::async_trait;
use bucketwatch_rules::Alert;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Mutex;

use crate::error::NotifyError;

/// An outbound alert channel.
#[async_trait]
pub trait AlertDelivery: Send + Sync {
    async fn deliver(&self, alert: &Alert) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "stdout").
    fn channel_name(&self) -> &str;
}

/// Writes each alert as one JSON line.
pub struct JsonLinesDelivery<W> {
    name: String,
    writer: Mutex<W>,
}

impl<W> JsonLinesDelivery<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl JsonLinesDelivery<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new("stdout", tokio::io::stdout())
    }
}

#[async_trait]
impl<W> AlertDelivery for JsonLinesDelivery<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn deliver(&self, alert: &Alert) -> Result<(), NotifyError> {
        let mut line = serde_json::to_vec(alert)?;
        line.push(b'\n');
        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        writer.flush().await?;
        Ok(())
    }

    fn channel_name(&self) -> &str {
        &self.name
    }
}

/// Counters reported when the alert stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    pub received: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Drain `rx` until every sender is dropped, delivering each alert to all
/// `channels`.
pub async fn run_delivery(
    mut rx: UnboundedReceiver<Alert>,
    channels: Vec<Box<dyn AlertDelivery>>,
) -> DeliveryStats {
    let mut stats = DeliveryStats::default();

    while let Some(alert) = rx.recv().await {
        stats.received += 1;
        for channel in &channels {
            let start = Instant::now();
            let result = channel.deliver(&alert).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(()) => {
                    stats.delivered += 1;
                    tracing::info!(
                        alert_id = %alert.id,
                        job_id = %alert.job_id,
                        channel = channel.channel_name(),
                        duration_ms,
                        "Alert delivered"
                    );
                }
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!(
                        alert_id = %alert.id,
                        job_id = %alert.job_id,
                        channel = channel.channel_name(),
                        error = %e,
                        duration_ms,
                        "Alert delivery failed"
                    );
                }
            }
        }
    }

    stats
}
