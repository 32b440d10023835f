//! Observation hooks invoked around each action.

use crate::core::{ActionResult, State};
use async_trait::async_trait;
use tracing::info;

/// Callbacks run by `step` immediately before and after an action.
///
/// Both default to no-ops. The engine does not guard hook panics.
#[async_trait]
pub trait Hooks: Send + Sync {
    async fn before_action(&self, _action: &str, _state: &State) {}

    async fn after_action(&self, _action: &str, _result: &ActionResult, _state: &State) {}
}

/// Hooks that log each action through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingHooks;

#[async_trait]
impl Hooks for TracingHooks {
    async fn before_action(&self, action: &str, state: &State) {
        info!(action, sequence_id = state.sequence_id(), "running action");
    }

    async fn after_action(&self, action: &str, result: &ActionResult, state: &State) {
        info!(
            action,
            success = result.is_success(),
            sequence_id = state.sequence_id(),
            "action finished"
        );
    }
}
