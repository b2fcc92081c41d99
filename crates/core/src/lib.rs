//! Anomaly-detection result model shared by the rule engine and alert delivery.
//!
//! Results arrive fully scored from the upstream model; everything here is a
//! read-mostly value object.

pub mod bucket;
pub mod config;
pub mod error;
pub mod influencer;
pub mod record;
pub mod stream;

pub use bucket::*;
pub use config::EngineConfig;
pub use error::*;
pub use influencer::*;
pub use record::*;
pub use stream::read_buckets;
