//! Immutable published view of the loaded documents.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::evaluator::ResultFilter;
use crate::schema::{JobRules, RuleDocument, ValueListDocument};
use crate::value_list::ValueLists;

/// Active configuration at one point in time.
///
/// Never mutated after publication; every change builds a new snapshot.
/// Disabled documents are not part of it.
#[derive(Debug, Clone, Default)]
pub struct RuleSnapshot {
    jobs: HashMap<String, JobRules>,
    value_lists: ValueLists,
}

impl RuleSnapshot {
    pub fn job(&self, job_id: &str) -> Option<&JobRules> {
        self.jobs.get(job_id)
    }

    pub fn jobs(&self) -> impl Iterator<Item = &JobRules> {
        self.jobs.values()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn value_lists(&self) -> &ValueLists {
        &self.value_lists
    }

    /// Result filter for `job_id`'s detection rules; `None` for an unknown job.
    pub fn result_filter(&self, job_id: &str) -> Option<ResultFilter<'_, ValueLists>> {
        self.jobs
            .get(job_id)
            .map(|job| ResultFilter::new(&job.detection_rules, &self.value_lists))
    }
}

/// Every loaded document, enabled or not, keyed by id per kind.
#[derive(Debug, Default)]
pub(super) struct DocumentStore {
    jobs: HashMap<String, JobRules>,
    lists: HashMap<String, ValueListDocument>,
}

impl DocumentStore {
    fn insert(&mut self, doc: RuleDocument) {
        match doc {
            RuleDocument::JobRules(job) => {
                self.jobs.insert(job.metadata.id.clone(), job);
            }
            RuleDocument::ValueList(list) => {
                self.lists.insert(list.metadata.id.clone(), list);
            }
        }
    }

    fn remove(&mut self, id: &str) -> bool {
        let job = self.jobs.remove(id).is_some();
        let list = self.lists.remove(id).is_some();
        job || list
    }

    fn documents(&self) -> Vec<RuleDocument> {
        self.jobs
            .values()
            .cloned()
            .map(RuleDocument::JobRules)
            .chain(self.lists.values().cloned().map(RuleDocument::ValueList))
            .collect()
    }

    fn build_snapshot(&self) -> RuleSnapshot {
        RuleSnapshot {
            jobs: self
                .jobs
                .iter()
                .filter(|(_, job)| job.metadata.enabled)
                .map(|(id, job)| (id.clone(), job.clone()))
                .collect(),
            value_lists: self.lists.values().filter(|l| l.metadata.enabled).collect(),
        }
    }
}

/// Store plus published snapshot, shared between the loader and its watcher.
#[derive(Debug, Default)]
pub(super) struct SharedRules {
    store: RwLock<DocumentStore>,
    snapshot: RwLock<Arc<RuleSnapshot>>,
}

impl SharedRules {
    pub(super) fn snapshot(&self) -> Arc<RuleSnapshot> {
        Arc::clone(&self.snapshot.read().expect("snapshot lock poisoned"))
    }

    pub(super) fn documents(&self) -> Vec<RuleDocument> {
        self.store.read().expect("store lock poisoned").documents()
    }

    pub(super) fn upsert(&self, doc: RuleDocument) {
        self.update(|store| {
            store.insert(doc);
            true
        });
    }

    pub(super) fn upsert_all(&self, docs: Vec<RuleDocument>) {
        self.update(|store| {
            for doc in docs {
                store.insert(doc);
            }
            true
        });
    }

    pub(super) fn remove(&self, id: &str) -> bool {
        self.update(|store| store.remove(id))
    }

    /// Apply `change` and, if it reports a modification, publish a new snapshot.
    fn update(&self, change: impl FnOnce(&mut DocumentStore) -> bool) -> bool {
        let mut store = self.store.write().expect("store lock poisoned");
        if !change(&mut store) {
            return false;
        }
        let next = Arc::new(store.build_snapshot());
        debug!(jobs = next.job_count(), value_lists = next.value_lists().len(), "publishing rule snapshot");
        *self.snapshot.write().expect("snapshot lock poisoned") = next;
        true
    }
}
