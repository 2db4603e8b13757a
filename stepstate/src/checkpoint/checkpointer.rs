//! Persists contexts when they are dirty and clears their flag afterwards.

use super::{CheckpointStore, JsonFileCheckpointStore};
use crate::config::CheckpointConfig;
use crate::context::{ContextSnapshot, MutableContext, SharedContext};
use crate::errors::{Result, StepStateError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// What a call to [`Checkpointer::checkpoint`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointOutcome {
    /// The context was clean; nothing was written.
    Skipped,
    /// A snapshot was saved and the dirty flag cleared.
    Saved {
        /// ID of the saved snapshot.
        id: Uuid,
        /// Number of entries written.
        entries: usize,
    },
}

impl CheckpointOutcome {
    /// Returns true if a snapshot was written.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// The owner-side persistence loop for a [`MutableContext`].
///
/// A checkpoint reads every entry, hands the snapshot to the store and only
/// then clears the dirty flag. If the store fails the context stays dirty so
/// the next attempt saves it again.
#[derive(Debug)]
pub struct Checkpointer<S> {
    store: S,
    skip_clean: bool,
}

impl<S: CheckpointStore> Checkpointer<S> {
    /// Creates a checkpointer that skips clean contexts.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            skip_clean: true,
        }
    }

    /// Sets whether clean contexts are skipped.
    #[must_use]
    pub fn with_skip_clean(mut self, skip_clean: bool) -> Self {
        self.skip_clean = skip_clean;
        self
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Saves `ctx` under `key` if it is dirty, then clears its flag.
    pub async fn checkpoint<V: Serialize>(
        &self,
        key: &str,
        ctx: &mut MutableContext<V>,
    ) -> Result<CheckpointOutcome> {
        if self.skip_clean && !ctx.is_dirty() {
            tracing::debug!(key = %key, "Context clean, skipping checkpoint");
            return Ok(CheckpointOutcome::Skipped);
        }

        let snapshot = ContextSnapshot::capture(ctx)?;
        if let Err(e) = self.store.save(key, &snapshot).await {
            tracing::warn!(key = %key, error = %e, "Checkpoint save failed, context left dirty");
            return Err(e);
        }
        ctx.clear_dirty_flag();

        tracing::info!(
            key = %key,
            snapshot_id = %snapshot.id,
            entries = snapshot.len(),
            "Saved checkpoint"
        );

        Ok(CheckpointOutcome::Saved {
            id: snapshot.id,
            entries: snapshot.len(),
        })
    }

    /// Saves a shared context under `key` if it is dirty.
    ///
    /// The snapshot is taken and the flag cleared under one write lock, so a
    /// `put` from another handle either lands in the snapshot or leaves the
    /// context dirty for the next checkpoint. If the store fails the context
    /// is marked dirty again.
    pub async fn checkpoint_shared<V: Serialize>(
        &self,
        key: &str,
        shared: &SharedContext<V>,
    ) -> Result<CheckpointOutcome> {
        let captured = shared.write(|ctx| {
            if self.skip_clean && !ctx.is_dirty() {
                return Ok(None);
            }
            let snapshot = ContextSnapshot::capture(ctx)?;
            ctx.clear_dirty_flag();
            Ok::<_, StepStateError>(Some(snapshot))
        })?;

        let Some(snapshot) = captured else {
            tracing::debug!(key = %key, "Shared context clean, skipping checkpoint");
            return Ok(CheckpointOutcome::Skipped);
        };

        if let Err(e) = self.store.save(key, &snapshot).await {
            shared.write(MutableContext::mark_dirty);
            tracing::warn!(key = %key, error = %e, "Checkpoint save failed, shared context re-marked dirty");
            return Err(e);
        }

        tracing::info!(
            key = %key,
            snapshot_id = %snapshot.id,
            entries = snapshot.len(),
            "Saved shared checkpoint"
        );

        Ok(CheckpointOutcome::Saved {
            id: snapshot.id,
            entries: snapshot.len(),
        })
    }

    /// Restores the context saved under `key`, if any. The result is clean.
    pub async fn restore<V: DeserializeOwned>(&self, key: &str) -> Result<Option<MutableContext<V>>> {
        let Some(snapshot) = self.store.load(key).await? else {
            tracing::debug!(key = %key, "No checkpoint to restore");
            return Ok(None);
        };

        let ctx = snapshot.restore()?;
        tracing::info!(
            key = %key,
            snapshot_id = %snapshot.id,
            entries = snapshot.len(),
            "Restored checkpoint"
        );
        Ok(Some(ctx))
    }

    /// Restores the context saved under `key`, or starts a fresh one.
    pub async fn restore_or_default<V: DeserializeOwned>(&self, key: &str) -> Result<MutableContext<V>> {
        Ok(self.restore(key).await?.unwrap_or_default())
    }

    /// Restores the context saved under `key`, failing if there is none.
    pub async fn require<V: DeserializeOwned>(&self, key: &str) -> Result<MutableContext<V>> {
        self.restore(key)
            .await?
            .ok_or_else(|| StepStateError::NotFound(key.to_string()))
    }

    /// Deletes the checkpoint under `key`.
    pub async fn discard(&self, key: &str) -> Result<bool> {
        let removed = self.store.delete(key).await?;
        if removed {
            tracing::debug!(key = %key, "Discarded checkpoint");
        }
        Ok(removed)
    }
}

impl Checkpointer<JsonFileCheckpointStore> {
    /// Creates a file-backed checkpointer from configuration.
    #[must_use]
    pub fn from_config(config: &CheckpointConfig) -> Self {
        Self::new(JsonFileCheckpointStore::from_config(config)).with_skip_clean(config.skip_clean)
    }
}
