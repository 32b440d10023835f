//! Errors raised by structural state operations.

use thiserror::Error;

/// Errors raised synchronously by `State` and `StateManager` operations.
///
/// These indicate wiring bugs in action implementations, not business
/// failures. Business failures travel as `ActionResult::Failure`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StateError {
    #[error("Key '{key}' not found in state")]
    KeyNotFound { key: String },

    #[error("Type mismatch for key '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot roll back {steps} step(s): history holds {available} state(s)")]
    OutOfRange { steps: usize, available: usize },

    #[error("Failed to deserialize state: {0}")]
    Deserialization(String),
}
