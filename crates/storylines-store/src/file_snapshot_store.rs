//! File-backed implementation of the `SnapshotStore` trait.

use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use storylines_core::error::DomainError;
use storylines_core::repository::SnapshotStore;
use tracing::debug;

/// Stores each snapshot as `<key>.json` inside a data directory.
///
/// Writes go to a temporary file in the same directory that is then renamed
/// over the target, so a crash never leaves a half-written snapshot behind.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, DomainError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DomainError::Validation(format!(
                "invalid snapshot key: {key:?}"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn infrastructure(action: &str, path: &Path, e: impl std::fmt::Display) -> DomainError {
    DomainError::Infrastructure(format!("failed to {action} {}: {e}", path.display()))
}

fn write_atomic(dir: &Path, path: &Path, contents: &str) -> Result<(), DomainError> {
    std::fs::create_dir_all(dir).map_err(|e| infrastructure("create", dir, e))?;
    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| infrastructure("create temp file in", dir, e))?;
    temp.write_all(contents.as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| infrastructure("write", temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| infrastructure("replace", path, e.error))?;
    Ok(())
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self, key: &str) -> Result<Option<String>, DomainError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No snapshot on disk");
                Ok(None)
            }
            Err(e) => Err(infrastructure("read", &path, e)),
        }
    }

    async fn save(&self, key: &str, snapshot: &str) -> Result<(), DomainError> {
        let path = self.path_for(key)?;
        let dir = self.dir.clone();
        let contents = snapshot.to_owned();
        tokio::task::spawn_blocking(move || write_atomic(&dir, &path, &contents))
            .await
            .map_err(|e| DomainError::Infrastructure(format!("snapshot write task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_key_returns_none() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());

        // Act
        let loaded = store.load("storylines_books_v3").await.unwrap();

        // Assert
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_returns_latest_snapshot() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nested"));

        // Act
        store.save("library", "[1]").await.unwrap();
        store.save("library", "[2]").await.unwrap();
        let loaded = store.load("library").await.unwrap();

        // Assert
        assert_eq!(loaded.as_deref(), Some("[2]"));
        assert!(dir.path().join("nested").join("library.json").is_file());
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());

        store.save("library", "[]").await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["library.json".to_owned()]);
    }

    #[tokio::test]
    async fn test_keys_cannot_escape_the_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());

        let result = store.save("../outside", "[]").await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(store.load("").await.is_err());
    }
}
