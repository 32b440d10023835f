//! Builder API for assembling applications.
//!
//! [`ApplicationBuilder`] registers actions, transitions, the entrypoint and
//! the initial state, then validates the whole graph at `build` time.
//! The [`transitions!`](crate::transitions) macro mixes plain and
//! conditioned edges in one list.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::ApplicationBuilder;
