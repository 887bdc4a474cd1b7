//! Snapshot persistence abstraction.
//!
//! The whole library is persisted as one JSON blob per key, mirroring the
//! key/value local storage the desktop front end used.

use async_trait::async_trait;

use crate::error::DomainError;

/// Key/value store for serialized snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Loads the snapshot stored under `key`, or `None` if nothing was saved.
    async fn load(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Replaces the snapshot stored under `key`.
    async fn save(&self, key: &str, snapshot: &str) -> Result<(), DomainError>;
}
