//! Loader errors and per-file load outcomes.

use std::path::PathBuf;

/// Why a rule document could not be read, activated or removed.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Not YAML, or the envelope (`apiVersion`/`kind`/`metadata`) is malformed.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The envelope parsed but the body does not fit its kind.
    #[error("failed to parse document '{id}': {reason}")]
    Body { id: String, reason: String },

    /// Structural validation found errors; the document is not activated.
    #[error("document '{id}' is invalid: {summary}")]
    Invalid { id: String, summary: String },

    /// A job's categorical condition names a value list that is not loaded.
    #[error("job '{job_id}' references value list '{list_id}', which is not loaded")]
    MissingValueList { job_id: String, list_id: String },

    /// An active job still filters on the value list being deleted.
    #[error("value list '{list_id}' is still referenced by job '{job_id}'")]
    ValueListInUse { list_id: String, job_id: String },

    #[error("no document file found for id '{id}'")]
    NotFound { id: String },

    #[error("rules directory watcher error: {0}")]
    Watch(#[from] notify::Error),
}

/// Result alias for loader operations.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Outcome of loading one file during a directory scan.
#[derive(Debug)]
pub struct LoadResult {
    pub path: PathBuf,
    pub status: LoadStatus,
}

#[derive(Debug)]
pub enum LoadStatus {
    /// Parsed, validated and part of the published snapshot (if enabled).
    Loaded { id: String },
    /// Dotfile or not a YAML file.
    Skipped { reason: String },
    /// Parse or validation error; the document is not active.
    Failed { error: String },
}
