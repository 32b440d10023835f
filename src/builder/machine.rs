//! Builder for constructing applications.

use crate::builder::error::BuildError;
use crate::checkpoint::{PersistenceError, Persister};
use crate::config::EngineConfig;
use crate::core::{Condition, State, StateManager};
use crate::effects::{Action, Hooks, StateMachineApplication, Transition, TransitionSpec};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::info;

/// Builder for constructing applications with a fluent API.
///
/// Graph validation happens in [`build`](Self::build).
pub struct ApplicationBuilder<C: Send + Sync> {
    actions: Vec<Arc<dyn Action<C>>>,
    transitions: Vec<TransitionSpec>,
    entrypoint: Option<String>,
    state: Option<State>,
    hooks: Vec<Arc<dyn Hooks>>,
    config: EngineConfig,
}

impl<C: Send + Sync> ApplicationBuilder<C> {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            transitions: Vec::new(),
            entrypoint: None,
            state: None,
            hooks: Vec::new(),
            config: EngineConfig::default(),
        }
    }

    /// Register an action under its own name.
    pub fn with_action<A>(mut self, action: A) -> Self
    where
        A: Action<C> + 'static,
    {
        self.actions.push(Arc::new(action));
        self
    }

    /// Register several already-shared actions.
    pub fn with_actions<I>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Action<C>>>,
    {
        self.actions.extend(actions);
        self
    }

    /// Add an unconditional edge.
    pub fn with_transition(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.transitions
            .push(TransitionSpec::new(source, target, None));
        self
    }

    /// Add an edge taken only when `condition` holds.
    pub fn with_conditional_transition(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        condition: Condition,
    ) -> Self {
        self.transitions
            .push(TransitionSpec::new(source, target, Some(condition)));
        self
    }

    /// Add edges from `(source, target)` or `(source, target, condition)`
    /// tuples. Use [`transitions!`](crate::transitions) to mix both forms.
    pub fn with_transitions<I, T>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TransitionSpec>,
    {
        self.transitions
            .extend(transitions.into_iter().map(Into::into));
        self
    }

    /// Add conditioned edges from `source` in order, then an optional
    /// unconditional `default` edge last.
    pub fn with_conditional_transitions<I, T>(
        mut self,
        source: impl Into<String>,
        edges: I,
        default: Option<&str>,
    ) -> Self
    where
        I: IntoIterator<Item = (Condition, T)>,
        T: Into<String>,
    {
        let source = source.into();
        for (condition, target) in edges {
            self.transitions
                .push(TransitionSpec::new(source.clone(), target, Some(condition)));
        }
        if let Some(target) = default {
            self.transitions
                .push(TransitionSpec::new(source, target, None));
        }
        self
    }

    /// Set the first action to execute (required).
    pub fn with_entrypoint(mut self, name: impl Into<String>) -> Self {
        self.entrypoint = Some(name.into());
        self
    }

    /// Set the initial state. Defaults to an empty state.
    pub fn with_state(mut self, state: State) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn Hooks>) -> Self {
        self.hooks.push(hooks);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.config.max_history = max_history;
        self
    }

    /// Seed the initial state from a persisted snapshot, if one exists.
    pub async fn resume_from<P>(
        mut self,
        persister: &P,
        app_id: &str,
        partition_key: Option<&str>,
    ) -> Result<Self, PersistenceError>
    where
        P: Persister + ?Sized,
    {
        if let Some(state) = persister.load(app_id, partition_key, None).await? {
            info!(app_id, sequence_id = state.sequence_id(), "resuming from persisted state");
            self.state = Some(state);
        }
        Ok(self)
    }

    /// Check the graph, accumulating every violation.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<BuildError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = Vec::new();
        let known: HashSet<&str> = self.actions.iter().map(|a| a.name()).collect();

        checks.push(if self.actions.is_empty() {
            Validation::fail(BuildError::EmptyGraph)
        } else {
            Validation::success(())
        });

        let entrypoint_known = self
            .entrypoint
            .as_deref()
            .is_some_and(|name| known.contains(name));
        checks.push(if entrypoint_known {
            Validation::success(())
        } else {
            Validation::fail(BuildError::UnknownEntrypoint {
                entrypoint: self.entrypoint.clone(),
            })
        });

        let mut seen = HashSet::new();
        for action in &self.actions {
            if !seen.insert(action.name()) {
                checks.push(Validation::fail(BuildError::DuplicateAction(
                    action.name().to_string(),
                )));
            }
        }

        for spec in &self.transitions {
            let (from, to) = (&spec.source, &spec.transition.target);
            if !known.contains(from.as_str()) {
                checks.push(Validation::fail(BuildError::UnknownTransitionSource {
                    from: from.clone(),
                    to: to.clone(),
                }));
            }
            if !known.contains(to.as_str()) {
                checks.push(Validation::fail(BuildError::UnknownTransitionTarget {
                    from: from.clone(),
                    to: to.clone(),
                }));
            }
        }

        if let Err(err) = self.config.validate() {
            checks.push(Validation::fail(BuildError::InvalidConfig(err.to_string())));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the application.
    ///
    /// Returns the first violation found by [`validate`](Self::validate):
    /// `EmptyGraph` before `UnknownEntrypoint` before the rest.
    pub fn build(self) -> Result<StateMachineApplication<C>, BuildError> {
        if let Validation::Failure(errors) = self.validate() {
            let first = errors.iter().next().cloned();
            return Err(first.unwrap_or(BuildError::EmptyGraph));
        }

        let entrypoint = self
            .actions
            .iter()
            .position(|action| Some(action.name()) == self.entrypoint.as_deref())
            .ok_or_else(|| BuildError::UnknownEntrypoint {
                entrypoint: self.entrypoint.clone(),
            })?;

        let mut transitions: HashMap<String, Vec<Transition>> = HashMap::new();
        for spec in self.transitions {
            transitions
                .entry(spec.source)
                .or_default()
                .push(spec.transition);
        }

        let state_manager = StateManager::with_max_history(
            self.state.unwrap_or_default(),
            self.config.max_history,
        );

        info!(
            actions = self.actions.len(),
            entrypoint = self.actions[entrypoint].name(),
            "built application"
        );

        Ok(StateMachineApplication::from_parts(
            self.actions,
            transitions,
            entrypoint,
            state_manager,
            self.hooks,
            self.config.default_max_steps,
        ))
    }
}

impl<C: Send + Sync> Default for ApplicationBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
