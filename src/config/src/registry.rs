//! Name-keyed resource registry with atomic snapshot replacement
//!
//! Configuration resources are stored as `Arc` snapshots inside a
//! [`DashMap`], so concurrent readers always observe either the previous or
//! the replacement value of a name, never a partially-updated one.
//! Single-writer, last-write-wins.

use crate::error::{ConfigError, Result};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry of named configuration resources of one kind
///
/// # Thread Safety
///
/// The registry is `Send + Sync` and intended to be shared via `Arc`.
/// Reads are lock-free; mutations swap whole `Arc` snapshots.
pub struct ResourceRegistry<T> {
    /// Resource kind, used in error and log messages (e.g. "regex-role-mapper")
    kind: &'static str,

    /// Current snapshots by resource name
    entries: DashMap<String, Arc<T>>,
}

impl<T: Send + Sync + 'static> ResourceRegistry<T> {
    /// Create an empty registry for the given resource kind
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: DashMap::new(),
        }
    }

    /// Register a new resource under `name`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Duplicate`] if the name is already taken.
    pub fn add(&self, name: impl Into<String>, value: T) -> Result<()> {
        let name = name.into();
        match self.entries.entry(name.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(ConfigError::Duplicate(self.qualify(&name)))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Arc::new(value));
                debug!(kind = self.kind, name = %name, "resource added");
                Ok(())
            }
        }
    }

    /// Current snapshot of the named resource
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if no resource has that name.
    pub fn get(&self, name: &str) -> Result<Arc<T>> {
        self.entries
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ConfigError::NotFound(self.qualify(name)))
    }

    /// Current snapshot, or `None` when the name is unbound
    pub fn try_get(&self, name: &str) -> Option<Arc<T>> {
        self.entries.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Replace the named resource wholesale with a new snapshot
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if no resource has that name.
    pub fn replace(&self, name: &str, value: T) -> Result<()> {
        match self.entries.get_mut(name) {
            Some(mut entry) => {
                *entry.value_mut() = Arc::new(value);
                debug!(kind = self.kind, name = %name, "resource replaced");
                Ok(())
            }
            None => Err(ConfigError::NotFound(self.qualify(name))),
        }
    }

    /// Derive a replacement snapshot from the current one and swap it in
    ///
    /// The closure runs under the entry lock; keep it cheap.
    pub fn update<F>(&self, name: &str, rewrite: F) -> Result<()>
    where
        F: FnOnce(&T) -> T,
    {
        match self.entries.get_mut(name) {
            Some(mut entry) => {
                let next = rewrite(entry.value());
                *entry.value_mut() = Arc::new(next);
                debug!(kind = self.kind, name = %name, "resource updated");
                Ok(())
            }
            None => Err(ConfigError::NotFound(self.qualify(name))),
        }
    }

    /// Remove the named resource
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if no resource has that name.
    pub fn remove(&self, name: &str) -> Result<()> {
        match self.entries.remove(name) {
            Some(_) => {
                debug!(kind = self.kind, name = %name, "resource removed");
                Ok(())
            }
            None => Err(ConfigError::NotFound(self.qualify(name))),
        }
    }

    /// True when a resource with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All registered names, sorted for deterministic output
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of registered resources
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no resources are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn qualify(&self, name: &str) -> String {
        format!("{} '{}'", self.kind, name)
    }
}
