//! Application runtime: executes actions and follows transitions.

use crate::checkpoint::{ApplicationCheckpoint, CheckpointError, CHECKPOINT_VERSION};
use crate::core::{ActionResult, State, StateError, StateManager};
use crate::effects::action::{execute, Action, Inputs};
use crate::effects::error::ApplicationError;
use crate::effects::graph::{ApplicationGraph, GraphEdge, GraphNode};
use crate::effects::hooks::Hooks;
use crate::effects::transition::{select_transition, Transition};
use chrono::Utc;
use futures::stream::{self, Stream};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Output of a single `step`.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutput {
    /// The action that was executed.
    pub action: String,
    pub result: ActionResult,
    /// State after the action (unchanged if it failed).
    pub state: State,
    /// The action selected next; `None` when no transition matched.
    pub next_action: Option<String>,
}

impl StepOutput {
    pub fn is_dead_end(&self) -> bool {
        self.next_action.is_none()
    }
}

/// Stopping rules for `run` and `iterate`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HaltConditions {
    pub halt_before: Vec<String>,
    pub halt_after: Vec<String>,
    /// Falls back to the configured default when `None`.
    pub max_steps: Option<usize>,
}

impl HaltConditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.halt_before.extend(actions.into_iter().map(Into::into));
        self
    }

    pub fn after<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.halt_after.extend(actions.into_iter().map(Into::into));
        self
    }

    pub fn max_steps(mut self, steps: usize) -> Self {
        self.max_steps = Some(steps);
        self
    }
}

/// Why a traversal stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExitReason {
    /// The named action was about to run and is listed in `halt_before`.
    HaltBefore(String),
    /// The named action just ran and is listed in `halt_after`.
    HaltAfter(String),
    /// The named action has no matching outgoing transition.
    DeadEnd(String),
    /// The step budget ran out. Not an error; the state reached is kept.
    MaxSteps(usize),
}

/// Final result of `run`.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    pub exit: ExitReason,
    /// Last executed action, `None` if nothing ran.
    pub action: Option<String>,
    pub result: Option<ActionResult>,
    pub state: State,
    pub steps: usize,
}

impl RunOutcome {
    pub fn hit_max_steps(&self) -> bool {
        matches!(self.exit, ExitReason::MaxSteps(_))
    }
}

/// Runtime graph of actions and transitions plus the current state.
///
/// Built with [`ApplicationBuilder`](crate::builder::ApplicationBuilder).
/// A single caller drives it; `step`, `run` and `iterate` take `&mut self`.
pub struct StateMachineApplication<C: Send + Sync> {
    actions: Vec<Arc<dyn Action<C>>>,
    index: HashMap<String, usize>,
    transitions: HashMap<String, Vec<Transition>>,
    entrypoint: usize,
    current: usize,
    state_manager: StateManager,
    hooks: Vec<Arc<dyn Hooks>>,
    default_max_steps: usize,
}

impl<C: Send + Sync> StateMachineApplication<C> {
    /// Assemble an application from validated parts.
    pub(crate) fn from_parts(
        actions: Vec<Arc<dyn Action<C>>>,
        transitions: HashMap<String, Vec<Transition>>,
        entrypoint: usize,
        state_manager: StateManager,
        hooks: Vec<Arc<dyn Hooks>>,
        default_max_steps: usize,
    ) -> Self {
        let index = actions
            .iter()
            .enumerate()
            .map(|(i, action)| (action.name().to_string(), i))
            .collect();
        Self {
            actions,
            index,
            transitions,
            entrypoint,
            current: entrypoint,
            state_manager,
            hooks,
            default_max_steps,
        }
    }

    /// Name of the action the next `step` will execute (pure).
    pub fn current_action(&self) -> &str {
        self.actions[self.current].name()
    }

    pub fn entrypoint(&self) -> &str {
        self.actions[self.entrypoint].name()
    }

    /// Current state (pure).
    pub fn state(&self) -> &State {
        self.state_manager.current()
    }

    pub fn state_manager(&self) -> &StateManager {
        &self.state_manager
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Action names in registration order.
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|action| action.name())
    }

    /// Roll the current state back without touching history or position.
    pub fn rollback(&mut self, steps: usize) -> Result<&State, StateError> {
        self.state_manager.rollback(steps)
    }

    /// Make `name` the next action to execute.
    pub fn jump_to(&mut self, name: &str) -> Result<(), ApplicationError> {
        let index = self
            .index
            .get(name)
            .copied()
            .ok_or_else(|| ApplicationError::UnknownAction(name.to_string()))?;
        self.current = index;
        Ok(())
    }

    /// Execute the current action once and follow the first matching
    /// transition.
    ///
    /// Action failures are returned in the output, never raised. On a dead
    /// end the current action is left unchanged.
    pub async fn step(&mut self, context: &C, inputs: Inputs) -> StepOutput {
        let action = Arc::clone(&self.actions[self.current]);
        let name = action.name().to_string();
        let before = self.state_manager.current().clone();

        for hook in &self.hooks {
            hook.before_action(&name, &before).await;
        }

        let (state, result) = execute(action.as_ref(), &before, context, &inputs).await;

        for hook in &self.hooks {
            hook.after_action(&name, &result, &state).await;
        }

        self.state_manager.update(state.clone());

        let next = self
            .transitions
            .get(&name)
            .and_then(|edges| select_transition(edges, &state, &result))
            .and_then(|transition| self.index.get(&transition.target).copied());

        let next_action = match next {
            Some(index) => {
                self.current = index;
                let target = self.actions[index].name().to_string();
                debug!(from = %name, to = %target, "transition selected");
                Some(target)
            }
            None => {
                debug!(action = %name, "no matching transition");
                None
            }
        };

        StepOutput {
            action: name,
            result,
            state,
            next_action,
        }
    }

    /// Step until a halt condition, a dead end, or the step budget.
    ///
    /// `inputs` go to the first action only.
    pub async fn run(&mut self, context: &C, halt: HaltConditions, inputs: Inputs) -> RunOutcome {
        let mut iteration = self.iterate(context, halt, inputs);
        let exit = loop {
            match iteration.advance().await {
                Progress::Stepped(_) => continue,
                Progress::Finished(exit) => break exit,
            }
        };
        iteration.into_outcome(exit)
    }

    /// Same traversal as `run`, yielding each step as it completes.
    ///
    /// ```rust,ignore
    /// let mut iteration = app.iterate(&ctx, HaltConditions::new().after(["publish"]), Inputs::new());
    /// while let Some(step) = iteration.next().await {
    ///     println!("{} -> {:?}", step.action, step.next_action);
    /// }
    /// assert_eq!(iteration.exit_reason(), Some(&ExitReason::HaltAfter("publish".into())));
    /// ```
    pub fn iterate<'a>(
        &'a mut self,
        context: &'a C,
        halt: HaltConditions,
        inputs: Inputs,
    ) -> Iterate<'a, C> {
        let max_steps = halt.max_steps.unwrap_or(self.default_max_steps);
        Iterate {
            app: self,
            context,
            halt,
            max_steps,
            inputs,
            steps: 0,
            exit: None,
            last_action: None,
            last_result: None,
        }
    }

    /// Structural description of actions and transitions (pure).
    pub fn get_graph(&self) -> ApplicationGraph {
        let nodes = self
            .actions
            .iter()
            .map(|action| GraphNode {
                name: action.name().to_string(),
                reads: action.reads().to_vec(),
                writes: action.writes().to_vec(),
            })
            .collect();
        let edges = self
            .actions
            .iter()
            .flat_map(|action| {
                let source = action.name();
                self.transitions
                    .get(source)
                    .into_iter()
                    .flatten()
                    .map(move |transition| GraphEdge {
                        source: source.to_string(),
                        target: transition.target.clone(),
                        condition: transition.condition_name().map(str::to_string),
                    })
            })
            .collect();
        ApplicationGraph {
            entrypoint: self.entrypoint().to_string(),
            nodes,
            edges,
        }
    }

    /// Capture position and history for a later `restore`.
    pub fn checkpoint(&self, app_id: impl Into<String>) -> ApplicationCheckpoint {
        ApplicationCheckpoint {
            version: CHECKPOINT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            app_id: app_id.into(),
            timestamp: Utc::now(),
            current_action: self.current_action().to_string(),
            state_manager: self.state_manager.clone(),
        }
    }

    /// Resume from a checkpoint taken from an application with the same graph.
    pub fn restore(&mut self, checkpoint: ApplicationCheckpoint) -> Result<(), CheckpointError> {
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: checkpoint.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        let index = self
            .index
            .get(&checkpoint.current_action)
            .copied()
            .ok_or_else(|| {
                CheckpointError::ValidationFailed(format!(
                    "checkpoint action '{}' is not registered",
                    checkpoint.current_action
                ))
            })?;
        info!(
            app_id = %checkpoint.app_id,
            action = %checkpoint.current_action,
            sequence_id = checkpoint.state_manager.current().sequence_id(),
            "restored application"
        );
        self.current = index;
        self.state_manager = checkpoint.state_manager;
        Ok(())
    }
}

enum Progress {
    Stepped(StepOutput),
    Finished(ExitReason),
}

/// In-progress traversal returned by [`StateMachineApplication::iterate`].
pub struct Iterate<'a, C: Send + Sync> {
    app: &'a mut StateMachineApplication<C>,
    context: &'a C,
    halt: HaltConditions,
    max_steps: usize,
    inputs: Inputs,
    steps: usize,
    exit: Option<ExitReason>,
    last_action: Option<String>,
    last_result: Option<ActionResult>,
}

impl<'a, C: Send + Sync> Iterate<'a, C> {
    async fn advance(&mut self) -> Progress {
        if let Some(exit) = &self.exit {
            return Progress::Finished(exit.clone());
        }

        let upcoming = self.app.current_action().to_string();
        if self.halt.halt_before.contains(&upcoming) {
            return self.finish(ExitReason::HaltBefore(upcoming));
        }
        if self.steps >= self.max_steps {
            warn!(
                max_steps = self.max_steps,
                action = %upcoming,
                "step budget exhausted, halting"
            );
            return self.finish(ExitReason::MaxSteps(self.max_steps));
        }

        let inputs = std::mem::take(&mut self.inputs);
        let output = self.app.step(self.context, inputs).await;
        self.steps += 1;
        self.last_action = Some(output.action.clone());
        self.last_result = Some(output.result.clone());

        if self.halt.halt_after.contains(&output.action) {
            self.exit = Some(ExitReason::HaltAfter(output.action.clone()));
        } else if output.is_dead_end() {
            self.exit = Some(ExitReason::DeadEnd(output.action.clone()));
        }
        Progress::Stepped(output)
    }

    fn finish(&mut self, exit: ExitReason) -> Progress {
        self.exit = Some(exit.clone());
        Progress::Finished(exit)
    }

    /// Execute the next step, or `None` once a halt condition is reached.
    pub async fn next(&mut self) -> Option<StepOutput> {
        match self.advance().await {
            Progress::Stepped(output) => Some(output),
            Progress::Finished(_) => None,
        }
    }

    /// Why the traversal stopped, once it has.
    pub fn exit_reason(&self) -> Option<&ExitReason> {
        self.exit.as_ref()
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Adapt into a `futures` stream of step outputs.
    pub fn into_stream(self) -> impl Stream<Item = StepOutput> + 'a {
        stream::unfold(self, |mut iteration| async move {
            let output = iteration.next().await?;
            Some((output, iteration))
        })
    }

    fn into_outcome(self, exit: ExitReason) -> RunOutcome {
        RunOutcome {
            exit,
            action: self.last_action,
            result: self.last_result,
            state: self.app.state().clone(),
            steps: self.steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ApplicationBuilder;
    use crate::core::Condition;
    use async_trait::async_trait;
    use futures::StreamExt;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct Emit {
        name: &'static str,
        result: ActionResult,
    }

    #[async_trait]
    impl Action<()> for Emit {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(&self, _: &State, _: &(), _: &Inputs) -> anyhow::Result<ActionResult> {
            Ok(self.result.clone())
        }
    }

    fn emit(name: &'static str) -> Emit {
        Emit {
            name,
            result: ActionResult::success().with_data([(format!("{name}_done"), true)]),
        }
    }

    struct Count(&'static str);

    #[async_trait]
    impl Action<()> for Count {
        fn name(&self) -> &str {
            self.0
        }

        async fn run(&self, state: &State, _: &(), inputs: &Inputs) -> anyhow::Result<ActionResult> {
            let count = state.get("count").and_then(Value::as_i64).unwrap_or(0);
            Ok(ActionResult::success()
                .with_data([("count", json!(count + 1)), ("had_inputs", json!(!inputs.is_empty()))]))
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Hooks for Recorder {
        async fn before_action(&self, action: &str, state: &State) {
            self.events
                .lock()
                .unwrap()
                .push(format!("before:{action}:{}", state.sequence_id()));
        }

        async fn after_action(&self, action: &str, result: &ActionResult, state: &State) {
            self.events.lock().unwrap().push(format!(
                "after:{action}:{}:{}",
                result.is_success(),
                state.sequence_id()
            ));
        }
    }

    fn self_loop() -> StateMachineApplication<()> {
        ApplicationBuilder::new()
            .with_action(Count("tick"))
            .with_transition("tick", "tick")
            .with_entrypoint("tick")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn step_executes_and_transitions() {
        let mut app = ApplicationBuilder::new()
            .with_action(emit("draft"))
            .with_action(emit("publish"))
            .with_transition("draft", "publish")
            .with_entrypoint("draft")
            .build()
            .unwrap();

        let output = app.step(&(), Inputs::new()).await;

        assert_eq!(output.action, "draft");
        assert_eq!(output.next_action.as_deref(), Some("publish"));
        assert_eq!(app.current_action(), "publish");
        assert_eq!(app.state().get("draft_done"), Some(&json!(true)));
        assert_eq!(app.state_manager().history().len(), 2);
    }

    #[tokio::test]
    async fn first_matching_transition_wins() {
        let mut app = ApplicationBuilder::new()
            .with_action(emit("start"))
            .with_action(emit("t1"))
            .with_action(emit("t2"))
            .with_action(emit("t3"))
            .with_conditional_transition("start", "t1", Condition::new("never", |_, _| false))
            .with_conditional_transition("start", "t2", Condition::on_success())
            .with_transition("start", "t3")
            .with_entrypoint("start")
            .build()
            .unwrap();

        let output = app.step(&(), Inputs::new()).await;
        assert_eq!(output.next_action.as_deref(), Some("t2"));
    }

    #[tokio::test]
    async fn dead_end_leaves_current_action() {
        let mut app = ApplicationBuilder::new()
            .with_action(emit("only"))
            .with_entrypoint("only")
            .build()
            .unwrap();

        let first = app.step(&(), Inputs::new()).await;
        let second = app.step(&(), Inputs::new()).await;

        assert!(first.is_dead_end());
        assert_eq!(app.current_action(), "only");
        assert_eq!(first.action, second.action);
        assert_eq!(first.result, second.result);
    }

    #[tokio::test]
    async fn failed_action_can_branch() {
        let mut app = ApplicationBuilder::new()
            .with_action(Emit {
                name: "charge",
                result: ActionResult::failure("card declined"),
            })
            .with_action(emit("receipt"))
            .with_action(emit("notify_failure"))
            .with_conditional_transitions(
                "charge",
                vec![(Condition::on_success(), "receipt")],
                Some("notify_failure"),
            )
            .with_entrypoint("charge")
            .build()
            .unwrap();

        let before = app.state().sequence_id();
        let output = app.step(&(), Inputs::new()).await;

        assert_eq!(output.result.error(), Some("card declined"));
        assert_eq!(output.next_action.as_deref(), Some("notify_failure"));
        assert_eq!(app.state().sequence_id(), before);
        assert_eq!(app.state_manager().history().len(), 2);
        assert_eq!(app.state_manager().history().back(), Some(app.state()));
    }

    #[tokio::test]
    async fn max_steps_halts_self_loop() {
        let mut app = self_loop();

        let outcome = app
            .run(&(), HaltConditions::new().max_steps(5), Inputs::new())
            .await;

        assert_eq!(outcome.exit, ExitReason::MaxSteps(5));
        assert!(outcome.hit_max_steps());
        assert_eq!(outcome.steps, 5);
        assert_eq!(outcome.state.get("count"), Some(&json!(5)));
        assert_eq!(outcome.action.as_deref(), Some("tick"));
    }

    #[tokio::test]
    async fn default_step_budget_comes_from_config() {
        let mut app = ApplicationBuilder::new()
            .with_action(Count("tick"))
            .with_transition("tick", "tick")
            .with_entrypoint("tick")
            .with_config(crate::config::EngineConfig {
                max_history: 3,
                default_max_steps: 4,
            })
            .build()
            .unwrap();

        let outcome = app.run(&(), HaltConditions::new(), Inputs::new()).await;

        assert_eq!(outcome.exit, ExitReason::MaxSteps(4));
        assert_eq!(app.state_manager().history().len(), 3);
    }

    #[tokio::test]
    async fn inputs_reach_only_the_first_action() {
        let mut app = self_loop();
        let mut inputs = Inputs::new();
        inputs.insert("site".to_string(), json!("s1"));

        let mut iteration = app.iterate(&(), HaltConditions::new().max_steps(2), inputs);
        let first = iteration.next().await.unwrap();
        let second = iteration.next().await.unwrap();

        assert_eq!(first.state.get("had_inputs"), Some(&json!(true)));
        assert_eq!(second.state.get("had_inputs"), Some(&json!(false)));
        assert!(iteration.next().await.is_none());
        assert_eq!(iteration.exit_reason(), Some(&ExitReason::MaxSteps(2)));
    }

    #[tokio::test]
    async fn halt_after_and_dead_end_are_reported() {
        let build = || {
            ApplicationBuilder::new()
                .with_action(emit("draft"))
                .with_action(emit("review"))
                .with_action(emit("publish"))
                .with_transitions([("draft", "review"), ("review", "publish")])
                .with_entrypoint("draft")
                .build()
                .unwrap()
        };

        let mut app = build();
        let outcome = app
            .run(&(), HaltConditions::new().after(["review"]), Inputs::new())
            .await;
        assert_eq!(outcome.exit, ExitReason::HaltAfter("review".to_string()));
        assert_eq!(app.current_action(), "publish");

        let mut app = build();
        let outcome = app.run(&(), HaltConditions::new(), Inputs::new()).await;
        assert_eq!(outcome.exit, ExitReason::DeadEnd("publish".to_string()));
        assert_eq!(outcome.steps, 3);
        assert!(outcome.state.contains("publish_done"));
    }

    #[tokio::test]
    async fn halt_before_stops_without_running() {
        let mut app = ApplicationBuilder::new()
            .with_action(emit("draft"))
            .with_action(emit("publish"))
            .with_transition("draft", "publish")
            .with_entrypoint("draft")
            .build()
            .unwrap();

        let outcome = app
            .run(&(), HaltConditions::new().before(["publish"]), Inputs::new())
            .await;

        assert_eq!(outcome.exit, ExitReason::HaltBefore("publish".to_string()));
        assert_eq!(outcome.steps, 1);
        assert!(!outcome.state.contains("publish_done"));

        let again = app
            .run(&(), HaltConditions::new().before(["publish"]), Inputs::new())
            .await;
        assert_eq!(again.steps, 0);
        assert!(again.action.is_none());
        assert!(again.result.is_none());
    }

    #[tokio::test]
    async fn hooks_wrap_each_action() {
        let recorder = Arc::new(Recorder::default());
        let mut app = ApplicationBuilder::new()
            .with_action(emit("draft"))
            .with_entrypoint("draft")
            .with_hooks(Arc::clone(&recorder) as Arc<dyn Hooks>)
            .build()
            .unwrap();

        app.step(&(), Inputs::new()).await;

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(events, vec!["before:draft:0", "after:draft:true:1"]);
    }

    #[tokio::test]
    async fn iterate_stream_yields_each_step() {
        let mut app = self_loop();
        let steps: Vec<StepOutput> = app
            .iterate(&(), HaltConditions::new().max_steps(3), Inputs::new())
            .into_stream()
            .collect()
            .await;

        let counts: Vec<Value> = steps
            .iter()
            .map(|s| s.state.get("count").cloned().unwrap_or(Value::Null))
            .collect();
        assert_eq!(counts, vec![json!(1), json!(2), json!(3)]);
    }

    #[tokio::test]
    async fn rollback_and_jump_reposition_the_application() {
        let mut app = self_loop();
        app.run(&(), HaltConditions::new().max_steps(3), Inputs::new())
            .await;

        let restored = app.rollback(2).unwrap().get("count").cloned();
        assert_eq!(restored, Some(json!(1)));
        assert_eq!(app.state_manager().history().len(), 4);

        assert!(app.jump_to("tick").is_ok());
        assert_eq!(
            app.jump_to("nowhere"),
            Err(ApplicationError::UnknownAction("nowhere".to_string()))
        );
    }

    #[tokio::test]
    async fn step_after_rollback_records_the_rolled_back_state() {
        let mut app = ApplicationBuilder::new()
            .with_action(Count("bump"))
            .with_action(Emit {
                name: "fail",
                result: ActionResult::failure("boom"),
            })
            .with_transition("bump", "bump")
            .with_entrypoint("bump")
            .build()
            .unwrap();

        app.step(&(), Inputs::new()).await;
        app.step(&(), Inputs::new()).await;
        app.rollback(1).unwrap();
        app.jump_to("fail").unwrap();
        let output = app.step(&(), Inputs::new()).await;

        let history = app.state_manager().history();
        assert_eq!(history.len(), 4);
        assert_eq!(output.state.sequence_id(), 1);
        assert_eq!(history.back(), Some(app.state()));
        assert_eq!(app.rollback(0).unwrap().sequence_id(), 1);
    }

    #[tokio::test]
    async fn graph_lists_nodes_and_edges_in_order() {
        let app: StateMachineApplication<()> = ApplicationBuilder::new()
            .with_action(emit("draft"))
            .with_action(emit("publish"))
            .with_conditional_transition("draft", "publish", Condition::on_success())
            .with_transition("draft", "draft")
            .with_entrypoint("draft")
            .build()
            .unwrap();

        let graph = app.get_graph();

        assert_eq!(graph.entrypoint, "draft");
        let names: Vec<&str> = graph.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["draft", "publish"]);
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.edges[0].condition.as_deref(), Some("on_success"));
        assert_eq!(graph.edges[1].target, "draft");
        assert!(graph.edges[1].condition.is_none());
    }

    #[tokio::test]
    async fn checkpoint_restores_position_and_history() {
        let mut app = self_loop();
        app.run(&(), HaltConditions::new().max_steps(2), Inputs::new())
            .await;
        let checkpoint = app.checkpoint("site-1");

        let mut resumed = self_loop();
        resumed.restore(checkpoint).unwrap();

        assert_eq!(resumed.current_action(), "tick");
        assert_eq!(resumed.state(), app.state());
        assert_eq!(resumed.state_manager().history().len(), 3);
    }

    #[tokio::test]
    async fn restore_rejects_unknown_action_and_version() {
        let mut app = self_loop();
        let mut checkpoint = app.checkpoint("site-1");
        checkpoint.current_action = "gone".to_string();
        assert!(matches!(
            app.restore(checkpoint),
            Err(CheckpointError::ValidationFailed(_))
        ));

        let mut checkpoint = app.checkpoint("site-1");
        checkpoint.version = CHECKPOINT_VERSION + 1;
        assert!(matches!(
            app.restore(checkpoint),
            Err(CheckpointError::UnsupportedVersion { .. })
        ));
    }
}
