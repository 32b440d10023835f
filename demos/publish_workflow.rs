//! Page Publishing Workflow
//!
//! This example walks a page draft through validation and publishing.
//!
//! Key concepts:
//! - Conditional transitions (approve vs. reject, publish failure branch)
//! - Restricted reads (validation only sees the draft fields)
//! - Halting before a step and resuming from a persisted snapshot
//! - Rolling back to an earlier state version
//!
//! Run with: RUST_LOG=info cargo run --example publish_workflow

use async_trait::async_trait;
use flowstate::checkpoint::{InMemoryPersister, Persister};
use flowstate::{
    Action, ActionResult, ApplicationBuilder, Condition, HaltConditions, Inputs, State,
    StateMachineApplication, TracingHooks,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// Caller-owned services handed to every action
struct Services {
    cdn_available: AtomicBool,
}

struct ValidateDraft {
    reads: Vec<String>,
}

#[async_trait]
impl Action<Services> for ValidateDraft {
    fn name(&self) -> &str {
        "validate"
    }

    fn reads(&self) -> &[String] {
        &self.reads
    }

    async fn run(&self, state: &State, _: &Services, _: &Inputs) -> anyhow::Result<ActionResult> {
        let words = state
            .get("body")
            .and_then(|v| v.as_str())
            .map(|body| body.split_whitespace().count())
            .unwrap_or(0);
        let verdict = if words >= 3 { "approve" } else { "reject" };
        Ok(ActionResult::success()
            .with_message(format!("{words} words"))
            .with_data([("verdict", json!(verdict)), ("word_count", json!(words))]))
    }
}

struct Publish;

#[async_trait]
impl Action<Services> for Publish {
    fn name(&self) -> &str {
        "publish"
    }

    async fn run(&self, state: &State, services: &Services, _: &Inputs) -> anyhow::Result<ActionResult> {
        if !services.cdn_available.load(Ordering::SeqCst) {
            anyhow::bail!("cdn rejected upload");
        }
        let slug: String = state.get_as("slug")?;
        Ok(ActionResult::success().with_data([("url", format!("https://example.test/{slug}"))]))
    }
}

struct NotifyFailure;

#[async_trait]
impl Action<Services> for NotifyFailure {
    fn name(&self) -> &str {
        "notify_failure"
    }

    async fn run(&self, _: &State, _: &Services, _: &Inputs) -> anyhow::Result<ActionResult> {
        Ok(ActionResult::success().with_data([("notified", true)]))
    }
}

struct ReturnToDraft;

#[async_trait]
impl Action<Services> for ReturnToDraft {
    fn name(&self) -> &str {
        "return_to_draft"
    }

    async fn run(&self, state: &State, _: &Services, _: &Inputs) -> anyhow::Result<ActionResult> {
        let words = state.get_or("word_count", &json!(0)).clone();
        Ok(ActionResult::failure(format!("draft too short ({words} words)")))
    }
}

fn build(initial: State) -> anyhow::Result<StateMachineApplication<Services>> {
    let app = ApplicationBuilder::new()
        .with_action(ValidateDraft {
            reads: vec!["body".to_string()],
        })
        .with_action(Publish)
        .with_action(NotifyFailure)
        .with_action(ReturnToDraft)
        .with_conditional_transitions(
            "validate",
            vec![(Condition::key_equals("verdict", json!("approve")), "publish")],
            Some("return_to_draft"),
        )
        .with_conditional_transition("publish", "notify_failure", Condition::on_failure())
        .with_entrypoint("validate")
        .with_state(initial)
        .with_hooks(Arc::new(TracingHooks))
        .build()?;
    Ok(app)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Page Publishing Workflow ===\n");

    let services = Services {
        cdn_available: AtomicBool::new(false),
    };
    let persister = InMemoryPersister::new();
    let draft = State::from_value(json!({
        "slug": "about",
        "body": "We build small tools for big sites.",
        "__session": "s-42",
    }))?;

    let mut app = build(draft)?;
    println!("{}\n", app.get_graph().to_dot());

    // Stop before publishing so the approved draft can be stored
    let outcome = app
        .run(&services, HaltConditions::new().before(["publish"]), Inputs::new())
        .await;
    println!("Halted: {:?} after {} step(s)", outcome.exit, outcome.steps);
    persister.save("about-page", &outcome.state, Some("user-1")).await?;

    // First publish attempt fails and branches to notify_failure
    let outcome = app
        .run(&services, HaltConditions::new(), Inputs::new())
        .await;
    println!("Attempt 1: {:?} after {} step(s)", outcome.exit, outcome.steps);

    // Undo the failure notification
    let restored = app.rollback(1)?;
    println!(
        "Rolled back to sequence {} (notified: {})",
        restored.sequence_id(),
        restored.contains("notified")
    );

    // A fresh process resumes from the stored snapshot
    services.cdn_available.store(true, Ordering::SeqCst);
    let mut resumed = ApplicationBuilder::new()
        .with_action(Publish)
        .with_action(NotifyFailure)
        .with_conditional_transition("publish", "notify_failure", Condition::on_failure())
        .with_entrypoint("publish")
        .with_hooks(Arc::new(TracingHooks))
        .resume_from(&persister, "about-page", Some("user-1"))
        .await?
        .build()?;
    let outcome = resumed
        .run(&services, HaltConditions::new(), Inputs::new())
        .await;
    println!(
        "Attempt 2: {:?}, url {:?}",
        outcome.exit,
        outcome.state.get("url")
    );

    Ok(())
}
