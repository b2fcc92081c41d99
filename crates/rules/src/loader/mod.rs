//! Filesystem document loader with hot-reload via `notify` watcher.
//!
//! Watches the rules directory for YAML file changes (create, modify, delete)
//! and republishes the active [`RuleSnapshot`] after each change.
//! Supports all document kinds via two-pass deserialization (RuleEnvelope -> RuleDocument).

mod core;
mod error;
mod snapshot;
mod watcher;


pub use self::core::RuleLoader;
pub use self::error::{LoadResult, LoadStatus, Result, RuleError};
pub use self::snapshot::RuleSnapshot;
