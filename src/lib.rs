//! Flowstate: a versioned state container and action graph engine
//!
//! Flowstate drives multi-step workflows (site creation, page generation,
//! publish pipelines) as a graph of named actions. Each action reads an
//! immutable [`State`], does its work asynchronously, and reports an
//! [`ActionResult`]. The engine folds the result's data into a new state
//! version and follows the first transition whose condition holds.
//!
//! # Core Concepts
//!
//! - **State**: immutable key-value data with a monotonically increasing `sequence_id`
//! - **StateManager**: current state plus bounded, rollback-capable history
//! - **Action**: async unit of work; errors and panics become failure results
//! - **Transition**: ordered, optionally conditioned edges between actions
//! - **Application**: `step`, `run` and `iterate` over the graph
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use flowstate::{Action, ActionResult, ApplicationBuilder, Condition, HaltConditions, Inputs, State};
//!
//! struct Validate;
//!
//! #[async_trait]
//! impl Action<()> for Validate {
//!     fn name(&self) -> &str {
//!         "validate"
//!     }
//!
//!     async fn run(&self, state: &State, _: &(), _: &Inputs) -> anyhow::Result<ActionResult> {
//!         match state.get("title") {
//!             Some(_) => Ok(ActionResult::success().with_data([("valid", true)])),
//!             None => Ok(ActionResult::failure("title is required")),
//!         }
//!     }
//! }
//!
//! struct Publish;
//!
//! #[async_trait]
//! impl Action<()> for Publish {
//!     fn name(&self) -> &str {
//!         "publish"
//!     }
//!
//!     async fn run(&self, _: &State, _: &(), _: &Inputs) -> anyhow::Result<ActionResult> {
//!         Ok(ActionResult::success().with_data([("published", true)]))
//!     }
//! }
//!
//! let mut app = ApplicationBuilder::new()
//!     .with_action(Validate)
//!     .with_action(Publish)
//!     .with_conditional_transition("validate", "publish", Condition::on_success())
//!     .with_entrypoint("validate")
//!     .with_state(State::empty().update([("title", "Home")]))
//!     .build()
//!     .unwrap();
//!
//! let outcome = futures::executor::block_on(app.run(&(), HaltConditions::new(), Inputs::new()));
//! assert_eq!(outcome.state.get("published"), Some(&serde_json::json!(true)));
//! ```

pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod core;
pub mod effects;

// Re-export commonly used types
pub use builder::{ApplicationBuilder, BuildError};
pub use checkpoint::{ApplicationCheckpoint, CheckpointError, InMemoryPersister, PersistenceError, Persister};
pub use config::EngineConfig;
pub use core::{ActionResult, Condition, State, StateError, StateManager};
pub use effects::{
    execute, Action, ApplicationError, ApplicationGraph, ExitReason, HaltConditions, Hooks, Inputs, RunOutcome,
    StateMachineApplication, StepOutput, TracingHooks, Transition, TypedAction,
};
