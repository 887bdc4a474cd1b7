//! Test stores: mock `SnapshotStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use storylines_core::error::DomainError;
use storylines_core::repository::SnapshotStore;

/// A snapshot store kept in memory. Records every `save` call so tests can
/// assert on what was persisted and how often.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshots: Mutex<HashMap<String, String>>,
    saves: Mutex<Vec<(String, String)>>,
}

impl InMemorySnapshotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `snapshot` under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_snapshot(key: &str, snapshot: &str) -> Self {
        let store = Self::default();
        store
            .snapshots
            .lock()
            .unwrap()
            .insert(key.to_owned(), snapshot.to_owned());
        store
    }

    /// Returns a copy of every `(key, snapshot)` pair passed to `save`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saved(&self) -> Vec<(String, String)> {
        self.saves.lock().unwrap().clone()
    }

    /// Returns the number of `save` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    /// Returns the most recently saved snapshot for `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn current(&self, key: &str) -> Option<String> {
        self.snapshots.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.snapshots.lock().unwrap().get(key).cloned())
    }

    async fn save(&self, key: &str, snapshot: &str) -> Result<(), DomainError> {
        self.snapshots
            .lock()
            .unwrap()
            .insert(key.to_owned(), snapshot.to_owned());
        self.saves
            .lock()
            .unwrap()
            .push((key.to_owned(), snapshot.to_owned()));
        Ok(())
    }
}

/// A snapshot store that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingSnapshotStore;

#[async_trait]
impl SnapshotStore for FailingSnapshotStore {
    async fn load(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Err(DomainError::Infrastructure("disk unavailable".into()))
    }

    async fn save(&self, _key: &str, _snapshot: &str) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("disk unavailable".into()))
    }
}
