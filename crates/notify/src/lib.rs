//! Alert delivery for the bucket rule engine.
//!
//! This crate provides:
//! - `AlertSink` implementations: logging, channel hand-off, per-job dispatch
//! - Minijinja template rendering for alert messages
//! - Async delivery of queued alerts (`AlertDelivery`, `run_delivery`)

pub mod channel;
pub mod delivery;
pub mod dispatcher;
pub mod error;
pub mod log_sink;
pub mod templating;

pub use channel::ChannelSink;
pub use delivery::{run_delivery, AlertDelivery, DeliveryStats, JsonLinesDelivery};
pub use dispatcher::Dispatcher;
pub use error::NotifyError;
pub use log_sink::LogSink;
pub use templating::{AlertTemplates, TemplateRenderer};
