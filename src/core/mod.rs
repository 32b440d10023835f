//! Core workflow types.
//!
//! This module contains the pure data side of the engine:
//! - `State`, the immutable versioned key-value container
//! - `StateManager`, the current state plus bounded history
//! - `ActionResult` and `Condition`, the inputs to transition selection
//!
//! Nothing here performs I/O. Execution lives in [`crate::effects`].

mod condition;
mod error;
mod history;
mod result;
mod state;

pub use condition::Condition;
pub use error::StateError;
pub use history::{StateManager, DEFAULT_MAX_HISTORY};
pub use result::ActionResult;
pub use state::{is_private_key, State, PRIVATE_PREFIX};
