//! Transition conditions.
//!
//! A condition is a named predicate over the post-action state and the
//! action's result. Evaluation fails closed: a predicate that errors or
//! panics counts as "do not transition".

use super::result::ActionResult;
use super::state::State;
use serde_json::Value;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

type Predicate = dyn Fn(&State, &ActionResult) -> anyhow::Result<bool> + Send + Sync;

/// Named predicate controlling whether a transition is taken.
///
/// # Example
///
/// ```rust
/// use flowstate::core::{ActionResult, Condition, State};
/// use serde_json::json;
///
/// let approved = Condition::key_equals("status", json!("approved"));
/// let state = State::from_value(json!({"status": "approved"})).unwrap();
///
/// assert!(approved.evaluate(&state, &ActionResult::success()));
/// assert!(!approved.negate().evaluate(&state, &ActionResult::success()));
/// ```
#[derive(Clone)]
pub struct Condition {
    name: String,
    predicate: Arc<Predicate>,
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition").field("name", &self.name).finish()
    }
}

impl Condition {
    /// Create a condition from an infallible predicate.
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&State, &ActionResult) -> bool + Send + Sync + 'static,
    {
        Self::fallible(name, move |state, result| Ok(predicate(state, result)))
    }

    /// Create a condition from a predicate that may fail.
    ///
    /// An `Err` is treated as `false`.
    pub fn fallible<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&State, &ActionResult) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Taken when the action succeeded.
    pub fn on_success() -> Self {
        Self::new("on_success", |_, result| result.is_success())
    }

    /// Taken when the action failed.
    pub fn on_failure() -> Self {
        Self::new("on_failure", |_, result| !result.is_success())
    }

    /// Taken when `key` holds exactly `expected`.
    pub fn key_equals(key: impl Into<String>, expected: Value) -> Self {
        let key = key.into();
        let name = format!("{key} == {expected}");
        Self::new(name, move |state, _| state.get(&key) == Some(&expected))
    }

    /// Taken when `key` is present in the state.
    pub fn key_present(key: impl Into<String>) -> Self {
        let key = key.into();
        let name = format!("has {key}");
        Self::new(name, move |state, _| state.contains(&key))
    }

    /// Logical negation. An erroring inner predicate still fails closed.
    pub fn negate(&self) -> Self {
        let inner = Arc::clone(&self.predicate);
        Self::fallible(format!("not({})", self.name), move |state, result| {
            inner(state, result).map(|taken| !taken)
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate the predicate, treating errors and panics as `false`.
    pub fn evaluate(&self, state: &State, result: &ActionResult) -> bool {
        match catch_unwind(AssertUnwindSafe(|| (self.predicate)(state, result))) {
            Ok(Ok(taken)) => taken,
            Ok(Err(err)) => {
                warn!(condition = %self.name, error = %err, "condition failed, not transitioning");
                false
            }
            Err(_) => {
                warn!(condition = %self.name, "condition panicked, not transitioning");
                false
            }
        }
    }
}
