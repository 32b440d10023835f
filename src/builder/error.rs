//! Build errors for the application builder.

use thiserror::Error;

/// Wiring errors detected when building an application.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("No actions registered. Add at least one action before .build()")]
    EmptyGraph,

    #[error(
        "Entrypoint '{}' is not a registered action. Call .with_entrypoint(name)",
        .entrypoint.as_deref().unwrap_or("<unset>")
    )]
    UnknownEntrypoint { entrypoint: Option<String> },

    #[error("Action '{0}' is registered more than once")]
    DuplicateAction(String),

    #[error("Transition '{from}' -> '{to}' starts at an unregistered action")]
    UnknownTransitionSource { from: String, to: String },

    #[error("Transition '{from}' -> '{to}' targets an unregistered action")]
    UnknownTransitionTarget { from: String, to: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
