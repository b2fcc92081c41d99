//! Resolution of named value lists used by categorical conditions.

use std::collections::{HashMap, HashSet};

use crate::schema::ValueListDocument;

/// Membership lookup for value lists referenced by id.
///
/// An id the implementation does not know resolves to the empty set.
pub trait ValueListLookup {
    fn contains(&self, list_id: &str, value: &str) -> bool;
}

/// In-memory value lists keyed by id. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueLists {
    lists: HashMap<String, HashSet<String>>,
}

impl ValueLists {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a list.
    pub fn insert<I, S>(&mut self, list_id: impl Into<String>, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists
            .insert(list_id.into(), items.into_iter().map(Into::into).collect());
    }

    pub fn remove(&mut self, list_id: &str) -> bool {
        self.lists.remove(list_id).is_some()
    }

    pub fn has_list(&self, list_id: &str) -> bool {
        self.lists.contains_key(list_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

impl ValueListLookup for ValueLists {
    fn contains(&self, list_id: &str, value: &str) -> bool {
        self.lists
            .get(list_id)
            .is_some_and(|items| items.contains(value))
    }
}

impl<'a> FromIterator<&'a ValueListDocument> for ValueLists {
    fn from_iter<T: IntoIterator<Item = &'a ValueListDocument>>(iter: T) -> Self {
        let mut lists = ValueLists::new();
        for doc in iter {
            lists.insert(doc.metadata.id.clone(), doc.items.iter().cloned());
        }
        lists
    }
}

/// Lookup that knows no lists; every categorical condition is false.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValueLists;

impl ValueListLookup for NoValueLists {
    fn contains(&self, _list_id: &str, _value: &str) -> bool {
        false
    }
}
