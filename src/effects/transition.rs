//! Directed, optionally conditioned edges between actions.

use crate::core::{ActionResult, Condition, State};

/// An edge to `target`, taken when `condition` holds.
///
/// A missing condition is an unconditional (default) edge.
#[derive(Clone, Debug)]
pub struct Transition {
    pub target: String,
    pub condition: Option<Condition>,
}

impl Transition {
    pub fn new(target: impl Into<String>, condition: Option<Condition>) -> Self {
        Self {
            target: target.into(),
            condition,
        }
    }

    /// Unconditional edge.
    pub fn always(target: impl Into<String>) -> Self {
        Self::new(target, None)
    }

    /// Check if this edge is taken for the post-action state and result (pure).
    pub fn should_transition(&self, state: &State, result: &ActionResult) -> bool {
        self.condition
            .as_ref()
            .is_none_or(|condition| condition.evaluate(state, result))
    }

    pub fn condition_name(&self) -> Option<&str> {
        self.condition.as_ref().map(Condition::name)
    }
}

/// Pick the first edge, in registration order, whose condition holds.
pub fn select_transition<'a>(
    transitions: &'a [Transition],
    state: &State,
    result: &ActionResult,
) -> Option<&'a Transition> {
    transitions
        .iter()
        .find(|transition| transition.should_transition(state, result))
}

/// A transition registration: `source -> target`, optionally conditioned.
///
/// Built from `(source, target)` or `(source, target, condition)` tuples.
#[derive(Clone, Debug)]
pub struct TransitionSpec {
    pub source: String,
    pub transition: Transition,
}

impl TransitionSpec {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        condition: Option<Condition>,
    ) -> Self {
        Self {
            source: source.into(),
            transition: Transition::new(target, condition),
        }
    }
}

impl<S: Into<String>, T: Into<String>> From<(S, T)> for TransitionSpec {
    fn from((source, target): (S, T)) -> Self {
        Self::new(source, target, None)
    }
}

impl<S: Into<String>, T: Into<String>> From<(S, T, Condition)> for TransitionSpec {
    fn from((source, target, condition): (S, T, Condition)) -> Self {
        Self::new(source, target, Some(condition))
    }
}
