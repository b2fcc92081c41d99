//! Core [`RuleLoader`] struct: filesystem-backed document loading with optional hot-reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{info, warn};

use crate::schema::{RuleDocument, RuleEnvelope};
use crate::validation::validate_document;
use crate::value_list::ValueLists;

use super::error::{LoadResult, LoadStatus, Result, RuleError};
use super::snapshot::{RuleSnapshot, SharedRules};
use super::watcher::handle_fs_event;

/// Filesystem-backed loader for `JobRules` and `ValueList` documents.
///
/// Scans a directory (recursively) for `*.yml` / `*.yaml` files, deserializes
/// them via two-pass deserialization, validates them, and publishes the
/// active set as an immutable [`RuleSnapshot`].
pub struct RuleLoader {
    /// Root directory containing YAML documents.
    rules_dir: PathBuf,
    /// Loaded documents and the snapshot published from them.
    shared: Arc<SharedRules>,
    /// Active filesystem watcher (held to keep it alive).
    _watcher: Option<RecommendedWatcher>,
}

impl RuleLoader {
    /// Create a new loader for the given directory.
    ///
    /// Creates the directory (and parents) if it does not exist.
    pub fn new(rules_dir: PathBuf) -> Self {
        if !rules_dir.exists() {
            if let Err(e) = fs::create_dir_all(&rules_dir) {
                warn!(path = %rules_dir.display(), error = %e, "failed to create rules directory");
            }
        }
        Self {
            rules_dir,
            shared: Arc::new(SharedRules::default()),
            _watcher: None,
        }
    }

    /// Recursively scan the rules directory and load all YAML files.
    ///
    /// Dotfiles and non-YAML files are skipped. Parse and validation errors
    /// are reported per file but do not abort the scan. Everything that
    /// loaded is published as one snapshot.
    pub fn load_all(&self) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();
        let mut docs = Vec::new();
        self.scan_dir_recursive(&self.rules_dir, &mut results, &mut docs)?;
        self.shared.upsert_all(docs);
        self.log_warnings();
        Ok(results)
    }

    /// Recursively scan a directory for YAML documents.
    fn scan_dir_recursive(
        &self,
        dir: &Path,
        results: &mut Vec<LoadResult>,
        docs: &mut Vec<RuleDocument>,
    ) -> Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "failed to read directory");
                return Ok(());
            }
        };

        for entry in entries {
            let entry = entry?;
            let path = entry.path();

            // Skip dotfiles/dotdirs
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            if path.is_dir() {
                self.scan_dir_recursive(&path, results, docs)?;
                continue;
            }

            if !is_yaml(&path) {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "not a YAML file".to_string(),
                    },
                });
                continue;
            }

            match self.load_file(&path) {
                Ok(doc) => {
                    let id = doc.metadata().id.clone();
                    info!(id = %id, kind = %doc.kind(), path = %path.display(), "loaded document");
                    docs.push(doc);
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Loaded { id },
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load document");
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Failed {
                            error: e.to_string(),
                        },
                    });
                }
            }
        }

        Ok(())
    }

    /// Parse and validate a single YAML file without activating it.
    ///
    /// First pass: deserialize as [`RuleEnvelope`] to read the `kind` field.
    /// Second pass: reconstruct and deserialize into the kind-specific type.
    pub fn load_file(&self, path: &Path) -> Result<RuleDocument> {
        let contents = fs::read_to_string(path)?;
        parse_document(&contents)
    }

    /// Log advisory warnings for the active snapshot.
    fn log_warnings(&self) {
        let snapshot = self.snapshot();
        for job in snapshot.jobs() {
            let doc = RuleDocument::JobRules(job.clone());
            for warning in validate_document(&doc, snapshot.value_lists()).warnings {
                warn!(job_id = %job.job_id(), path = %warning.path, "{}", warning.message);
            }
        }
    }

    /// Start a filesystem watcher with 500ms debounce.
    ///
    /// On file create/modify the document is re-parsed and a new snapshot
    /// published. On file delete the document is removed by file stem.
    /// Parse errors are logged as warnings; the previous version is kept.
    pub fn watch(&mut self) -> Result<()> {
        let shared = Arc::clone(&self.shared);

        let mut watcher = notify::recommended_watcher(move |res: std::result::Result<notify::Event, notify::Error>| {
            match res {
                Ok(event) => handle_fs_event(&event, &shared),
                Err(e) => warn!(error = %e, "filesystem watcher error"),
            }
        })?;

        watcher.watch(&self.rules_dir, RecursiveMode::Recursive)?;

        if let Err(e) =
            watcher.configure(notify::Config::default().with_poll_interval(Duration::from_millis(500)))
        {
            warn!(error = %e, "failed to set watcher poll interval; using backend default");
        }

        info!(path = %self.rules_dir.display(), "watching rules directory for changes (recursive)");
        self._watcher = Some(watcher);
        Ok(())
    }

    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// The currently active configuration.
    pub fn snapshot(&self) -> Arc<RuleSnapshot> {
        self.shared.snapshot()
    }

    /// Every loaded document, including disabled ones.
    pub fn documents(&self) -> Vec<RuleDocument> {
        self.shared.documents()
    }

    /// Atomically write a document to a YAML file and activate it.
    ///
    /// Jobs may only reference value lists that are already loaded. Writes
    /// to a `.tmp` file first, then renames to the final path to avoid
    /// partial writes on crash.
    pub fn write_document(&self, doc: &RuleDocument) -> Result<PathBuf> {
        let meta = doc.metadata();
        let snapshot = self.snapshot();
        let result = validate_document(doc, snapshot.value_lists());
        if !result.valid {
            return Err(RuleError::Invalid {
                id: meta.id.clone(),
                summary: result.error_summary(),
            });
        }
        if let Some(job) = doc.as_job_rules() {
            if let Some(list_id) = job
                .value_list_ids()
                .find(|list_id| !snapshot.value_lists().has_list(list_id))
            {
                return Err(RuleError::MissingValueList {
                    job_id: job.job_id().to_string(),
                    list_id: list_id.to_string(),
                });
            }
        }

        let final_path = self.rules_dir.join(format!("{}.yml", meta.id));
        let tmp_path = self.rules_dir.join(format!(".{}.tmp", meta.id));

        let yaml = doc.to_yaml()?;
        fs::write(&tmp_path, yaml)?;
        fs::rename(&tmp_path, &final_path)?;

        info!(id = %meta.id, kind = %doc.kind(), path = %final_path.display(), "wrote document");

        self.shared.upsert(doc.clone());
        Ok(final_path)
    }

    /// Delete a document file by id and deactivate it.
    ///
    /// A value list that an active job still references is kept.
    pub fn delete_document(&self, id: &str) -> Result<()> {
        let snapshot = self.snapshot();
        if snapshot.value_lists().has_list(id) {
            if let Some(job) = snapshot
                .jobs()
                .find(|job| job.value_list_ids().any(|list_id| list_id == id))
            {
                return Err(RuleError::ValueListInUse {
                    list_id: id.to_string(),
                    job_id: job.job_id().to_string(),
                });
            }
        }

        let yml_path = self.rules_dir.join(format!("{}.yml", id));
        let yaml_path = self.rules_dir.join(format!("{}.yaml", id));

        let removed = if yml_path.exists() {
            fs::remove_file(&yml_path)?;
            true
        } else if yaml_path.exists() {
            fs::remove_file(&yaml_path)?;
            true
        } else {
            false
        };

        if !removed {
            return Err(RuleError::NotFound { id: id.to_string() });
        }

        self.shared.remove(id);

        info!(id = %id, "deleted document");
        Ok(())
    }
}

/// Two-pass parse plus validation. Warnings are not fatal; errors are.
pub(super) fn parse_document(contents: &str) -> Result<RuleDocument> {
    let envelope: RuleEnvelope = serde_yaml::from_str(contents)?;

    let doc = envelope.parse_full().map_err(|reason| RuleError::Body {
        id: envelope.metadata.id.clone(),
        reason,
    })?;

    let result = validate_document(&doc, &ValueLists::new());
    if !result.valid {
        return Err(RuleError::Invalid {
            id: doc.metadata().id.clone(),
            summary: result.error_summary(),
        });
    }
    Ok(doc)
}

pub(super) fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "yml" || e == "yaml")
        .unwrap_or(false)
}
