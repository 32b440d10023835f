//! Actions and the framework-owned `execute` wrapper.

use crate::core::{ActionResult, State};
use async_trait::async_trait;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, warn};

/// Keyword inputs supplied to a single action run.
pub type Inputs = Map<String, Value>;

/// A named unit of work over the workflow state.
///
/// Implementors supply only `run`. The framework calls it through
/// [`execute`], which restricts the visible state to `reads` and applies
/// the result's data on success. `writes` is informational.
///
/// `C` is the caller-owned context (identity, service handles). The engine
/// passes it through untouched.
#[async_trait]
pub trait Action<C: Send + Sync>: Send + Sync {
    fn name(&self) -> &str;

    /// Keys visible to `run`. Empty means the full state.
    fn reads(&self) -> &[String] {
        &[]
    }

    /// Keys this action is expected to produce.
    fn writes(&self) -> &[String] {
        &[]
    }

    async fn run(&self, state: &State, context: &C, inputs: &Inputs) -> anyhow::Result<ActionResult>;
}

/// An action with a typed input record.
///
/// Wrap it in [`Typed`] to register it with an application. Raw inputs
/// are decoded into `Input` before `run`; a decode failure becomes a
/// failed result.
#[async_trait]
pub trait TypedAction<C: Send + Sync>: Send + Sync {
    type Input: DeserializeOwned + Send;

    fn name(&self) -> &str;

    fn reads(&self) -> &[String] {
        &[]
    }

    fn writes(&self) -> &[String] {
        &[]
    }

    async fn run(&self, state: &State, context: &C, input: Self::Input) -> anyhow::Result<ActionResult>;
}

/// Adapter registering a [`TypedAction`] as an [`Action`].
pub struct Typed<A>(pub A);

#[async_trait]
impl<C, A> Action<C> for Typed<A>
where
    C: Send + Sync,
    A: TypedAction<C>,
{
    fn name(&self) -> &str {
        self.0.name()
    }

    fn reads(&self) -> &[String] {
        self.0.reads()
    }

    fn writes(&self) -> &[String] {
        self.0.writes()
    }

    async fn run(&self, state: &State, context: &C, inputs: &Inputs) -> anyhow::Result<ActionResult> {
        let input: A::Input = serde_json::from_value(Value::Object(inputs.clone()))
            .map_err(|e| anyhow::anyhow!("invalid inputs for '{}': {e}", self.0.name()))?;
        self.0.run(state, context, input).await
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "action panicked".to_string()
    }
}

/// Run `action` against `state` and apply its result.
///
/// Steps: compute the read view, call `run`, and on success with data
/// return `state.update(data)`; otherwise return `state` unchanged. An
/// `Err` or panic from `run` becomes `ActionResult::Failure`, so this
/// never fails.
pub async fn execute<C: Send + Sync>(
    action: &dyn Action<C>,
    state: &State,
    context: &C,
    inputs: &Inputs,
) -> (State, ActionResult) {
    let reads = action.reads();
    let view = if reads.is_empty() {
        state.clone()
    } else {
        state.subset(reads)
    };

    let outcome = AssertUnwindSafe(action.run(&view, context, inputs))
        .catch_unwind()
        .await;

    let result = match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => ActionResult::failure(format!("{err:#}")),
        Err(payload) => ActionResult::failure(panic_message(payload.as_ref())),
    };

    match &result {
        ActionResult::Success {
            data: Some(data), ..
        } => {
            let next = state.update(data.clone());
            debug!(action = action.name(), sequence_id = next.sequence_id(), "action applied");
            (next, result)
        }
        ActionResult::Success { data: None, .. } => (state.clone(), result),
        ActionResult::Failure { error, .. } => {
            warn!(action = action.name(), %error, "action failed");
            (state.clone(), result)
        }
    }
}
