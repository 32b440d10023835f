//! Errors raised while saving or restoring an application checkpoint.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckpointError {
    /// `ApplicationCheckpoint::to_json` could not encode a state value
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Checkpoint JSON is malformed, or its state manager breaks a history
    /// bound (for example `max_history` of zero)
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Checkpoint was written by a different format version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Checkpoint names an action the restoring application does not have
    #[error("Checkpoint validation failed: {0}")]
    ValidationFailed(String),
}
