//! Alert triggering and fan-out.
//!
//! [`AlertTrigger`](crate::schema::AlertTrigger) evaluation lives in `trigger`,
//! alert construction in `alert`, and [`AlertObserver`] walks a job's triggers
//! and hands every match to an [`AlertSink`].

mod alert;
mod observer;
mod sink;
mod trigger;

pub use alert::{Alert, AlertPayload};
pub use observer::AlertObserver;
pub use sink::AlertSink;
pub use trigger::is_greater_or_equal;
