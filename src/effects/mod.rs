//! Effectful side of the engine.
//!
//! Actions perform I/O; the application drives them one at a time and
//! follows transitions between them.
//!
//! # Key Concepts
//!
//! - **Action**: async unit of work reading `State` and returning an `ActionResult`
//! - **Transition**: edge to the next action, optionally guarded by a `Condition`
//! - **Application**: runtime graph with `step`, `run` and `iterate`

mod action;
mod error;
mod graph;
mod hooks;
mod machine;
mod transition;

pub use action::{execute, Action, Inputs, Typed, TypedAction};
pub use error::ApplicationError;
pub use graph::{ApplicationGraph, GraphEdge, GraphNode};
pub use hooks::{Hooks, TracingHooks};
pub use machine::{
    ExitReason, HaltConditions, Iterate, RunOutcome, StateMachineApplication, StepOutput,
};
pub use transition::{select_transition, Transition, TransitionSpec};
