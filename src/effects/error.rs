//! Runtime error types.

use thiserror::Error;

/// Errors from repositioning a running application.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApplicationError {
    /// No action with this name is registered
    #[error("Unknown action '{0}'")]
    UnknownAction(String),
}
