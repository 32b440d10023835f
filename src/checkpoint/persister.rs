//! Durable snapshot storage boundary.
//!
//! The engine never calls a persister itself. Callers save the application's
//! state between invocations and seed a new application with
//! [`ApplicationBuilder::resume_from`](crate::builder::ApplicationBuilder::resume_from).

use crate::core::{State, StateError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Stored snapshot is corrupt: {0}")]
    Corrupt(#[from] StateError),
}

/// Load/save of `State` snapshots keyed by application id and an optional
/// partition key (for example a user or tenant id).
#[async_trait]
pub trait Persister: Send + Sync {
    /// Store `state`, overwriting any prior snapshot for the key.
    async fn save(
        &self,
        app_id: &str,
        state: &State,
        partition_key: Option<&str>,
    ) -> Result<bool, PersistenceError>;

    /// Fetch the stored snapshot.
    ///
    /// When `sequence_id` is given and differs from the stored snapshot's,
    /// returns `None` so a stale writer can detect the conflict.
    async fn load(
        &self,
        app_id: &str,
        partition_key: Option<&str>,
        sequence_id: Option<u64>,
    ) -> Result<Option<State>, PersistenceError>;

    /// Remove the snapshot. Returns whether one existed.
    async fn delete(&self, app_id: &str, partition_key: Option<&str>)
        -> Result<bool, PersistenceError>;

    /// Application ids stored under `partition_key`, sorted.
    async fn list_app_ids(&self, partition_key: Option<&str>) -> Result<Vec<String>, PersistenceError>;
}

type SnapshotKey = (Option<String>, String);

/// Process-local persister holding serialized snapshots.
#[derive(Debug, Default)]
pub struct InMemoryPersister {
    snapshots: RwLock<HashMap<SnapshotKey, Value>>,
}

impl InMemoryPersister {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(app_id: &str, partition_key: Option<&str>) -> SnapshotKey {
        (partition_key.map(str::to_string), app_id.to_string())
    }
}

#[async_trait]
impl Persister for InMemoryPersister {
    async fn save(
        &self,
        app_id: &str,
        state: &State,
        partition_key: Option<&str>,
    ) -> Result<bool, PersistenceError> {
        let mut snapshots = self.snapshots.write().await;
        snapshots.insert(Self::key(app_id, partition_key), state.serialize());
        debug!(app_id, sequence_id = state.sequence_id(), "saved state");
        Ok(true)
    }

    async fn load(
        &self,
        app_id: &str,
        partition_key: Option<&str>,
        sequence_id: Option<u64>,
    ) -> Result<Option<State>, PersistenceError> {
        let snapshots = self.snapshots.read().await;
        let Some(payload) = snapshots.get(&Self::key(app_id, partition_key)) else {
            return Ok(None);
        };
        let state = State::deserialize(payload)?;

        match sequence_id {
            Some(expected) if expected != state.sequence_id() => {
                warn!(
                    app_id,
                    expected,
                    stored = state.sequence_id(),
                    "sequence id mismatch on load"
                );
                Ok(None)
            }
            _ => Ok(Some(state)),
        }
    }

    async fn delete(
        &self,
        app_id: &str,
        partition_key: Option<&str>,
    ) -> Result<bool, PersistenceError> {
        let mut snapshots = self.snapshots.write().await;
        Ok(snapshots.remove(&Self::key(app_id, partition_key)).is_some())
    }

    async fn list_app_ids(&self, partition_key: Option<&str>) -> Result<Vec<String>, PersistenceError> {
        let snapshots = self.snapshots.read().await;
        let mut ids: Vec<String> = snapshots
            .keys()
            .filter(|(partition, _)| partition.as_deref() == partition_key)
            .map(|(_, app_id)| app_id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}
