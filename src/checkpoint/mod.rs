//! Checkpoint and resume functionality for applications.
//!
//! A checkpoint captures where an application is (its next action) and what
//! it has seen (the full `StateManager`), so a workflow can survive a process
//! restart. Actions and conditions are code and are never serialized; restore
//! into an application built from the same graph.

use crate::core::StateManager;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;
pub mod persister;

pub use error::CheckpointError;
pub use persister::{InMemoryPersister, PersistenceError, Persister};

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable resume point of a `StateMachineApplication`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCheckpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// Application the checkpoint belongs to
    pub app_id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Action the application will execute next
    pub current_action: String,

    /// Current state plus bounded history
    pub state_manager: StateManager,
}

impl ApplicationCheckpoint {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: checkpoint.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(checkpoint)
    }
}
