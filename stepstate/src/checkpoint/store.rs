//! Checkpoint storage backends.

use crate::config::CheckpointConfig;
use crate::context::ContextSnapshot;
use crate::errors::{Result, StepStateError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Durable storage for context snapshots, addressed by key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Stores `snapshot` under `key`, replacing any previous one.
    async fn save(&self, key: &str, snapshot: &ContextSnapshot) -> Result<()>;

    /// Loads the snapshot stored under `key`, if any.
    async fn load(&self, key: &str) -> Result<Option<ContextSnapshot>>;

    /// Deletes the snapshot under `key`. Returns false if there was none.
    async fn delete(&self, key: &str) -> Result<bool>;
}

/// An in-process store, mostly for tests and single-run jobs.
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    snapshots: RwLock<HashMap<String, ContextSnapshot>>,
}

impl MemoryCheckpointStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored checkpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }

    /// Returns all stored keys.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.snapshots.read().keys().cloned().collect()
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn save(&self, key: &str, snapshot: &ContextSnapshot) -> Result<()> {
        self.snapshots
            .write()
            .insert(key.to_string(), snapshot.clone());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<ContextSnapshot>> {
        Ok(self.snapshots.read().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.snapshots.write().remove(key).is_some())
    }
}

/// Stores each checkpoint as `<directory>/<key>.json`.
///
/// Each write goes to its own uniquely named temporary sibling which is then
/// renamed over the target, so readers never see a partially written
/// checkpoint and concurrent saves of one key never trip over each other.
#[derive(Debug, Clone)]
pub struct JsonFileCheckpointStore {
    directory: PathBuf,
    pretty: bool,
}

impl JsonFileCheckpointStore {
    /// Creates a store rooted at `directory`.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            pretty: true,
        }
    }

    /// Creates a store from configuration.
    #[must_use]
    pub fn from_config(config: &CheckpointConfig) -> Self {
        Self::new(config.directory.clone()).with_pretty(config.pretty)
    }

    /// Sets whether files are pretty-printed.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Returns the root directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.directory.join(format!("{key}.json")))
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StepStateError::Config("checkpoint key must not be empty".to_string()));
    }
    if key.contains(['/', '\\']) || key == "." || key == ".." {
        return Err(StepStateError::Config(format!(
            "checkpoint key '{key}' must not contain path separators"
        )));
    }
    Ok(())
}

async fn write_then_rename(tmp: &Path, path: &Path, bytes: Vec<u8>) -> std::io::Result<()> {
    tokio::fs::write(tmp, bytes).await?;
    tokio::fs::rename(tmp, path).await
}

#[async_trait]
impl CheckpointStore for JsonFileCheckpointStore {
    async fn save(&self, key: &str, snapshot: &ContextSnapshot) -> Result<()> {
        let path = self.path_for(key)?;
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(snapshot)?
        } else {
            serde_json::to_vec(snapshot)?
        };

        tokio::fs::create_dir_all(&self.directory).await?;
        let tmp = self
            .directory
            .join(format!("{key}.{}.json.tmp", Uuid::new_v4().simple()));
        if let Err(e) = write_then_rename(&tmp, &path, bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::trace!(path = %path.display(), "Wrote checkpoint file");
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<ContextSnapshot>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
