//! Dispatching executor with lifecycle instrumentation.
//!
//! [`ActionExecutor::execute`] is the single entry point callers use to run an
//! action. Every invocation gets its own derived context, is timed, runs
//! behind an error/panic boundary, and ends with exactly one lifecycle event
//! on the bus (except unknown ids, which only produce a failed result).

mod registry;

pub use registry::ActionRegistry;

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use tokio::task::JoinError;
use tracing::{debug, error, info, warn};

use crate::api::{Action, ActionError, ActionParams, ActionResult, ContextError};
use crate::context::ContextManager;
use crate::events::{ActionCompleted, ActionFailed, Event, EventBus, panic_message};

/// Registry of actions plus the lifecycle wrapper around their execution.
///
/// No queue and no concurrency limit: overlapping calls to
/// [`execute`](Self::execute) run independently, each with its own context
/// and interrupt signal.
pub struct ActionExecutor {
    registry: RwLock<ActionRegistry>,
    contexts: Arc<ContextManager>,
    events: EventBus,
}

impl ActionExecutor {
    pub fn new(contexts: Arc<ContextManager>, events: EventBus) -> Self {
        Self {
            registry: RwLock::new(ActionRegistry::new()),
            contexts,
            events,
        }
    }

    /// Registers an action under its id, replacing (with a warning) any
    /// action already registered under that id.
    pub fn register(&self, action: Arc<dyn Action>) {
        let id = action.id().to_string();
        let previous = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(action);

        if previous.is_some() {
            warn!(
                target: "runtime::executor",
                action_id = %id,
                "Action re-registered, replacing previous"
            );
        } else {
            debug!(target: "runtime::executor", action_id = %id, "Action registered");
        }
    }

    pub fn register_all(&self, actions: impl IntoIterator<Item = Arc<dyn Action>>) {
        for action in actions {
            self.register(action);
        }
    }

    /// Runs the action registered under `id`.
    ///
    /// Always resolves to a complete [`ActionResult`]:
    /// - unknown id: `"<id> not registered"`, no event emitted
    /// - normal return: the action's result, plus `actionComplete`
    /// - `Err` or panic: `"execution exception: <message>"`, plus
    ///   `actionError` carrying the original error
    pub async fn execute(&self, id: &str, params: impl Into<ActionParams>) -> ActionResult {
        let Some(action) = self.action(id) else {
            warn!(target: "runtime::executor", action_id = id, "Action not registered");
            return ActionResult::failure(format!("{id} not registered"));
        };
        let action_name = action.name().to_string();

        let ctx = match self.contexts.create_action_context(&action_name) {
            Ok(ctx) => ctx,
            Err(e) => {
                error!(
                    target: "runtime::executor",
                    action_id = id,
                    error = %e,
                    "Cannot derive action context"
                );
                return ActionResult::failure(format!("cannot prepare context for {id}: {e}"));
            }
        };
        let params = params.into();

        debug!(target: "runtime::executor", action_id = id, "Executing action");

        // Detached: the lifecycle event is emitted even if the caller drops
        // this future while the action keeps running.
        let events = self.events.clone();
        let action_id = id.to_string();
        let lifecycle = tokio::spawn(async move {
            let started = Instant::now();
            // Nested task: a panic in the action surfaces as a JoinError.
            let outcome = tokio::spawn(async move { action.execute(&ctx, params).await }).await;
            let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            conclude(&events, &action_id, action_name, outcome, duration_ms)
        });

        match lifecycle.await {
            Ok(result) => result,
            Err(join_error) => {
                error!(
                    target: "runtime::executor",
                    action_id = id,
                    error = %join_error,
                    "Action lifecycle task aborted"
                );
                ActionResult::failure(format!("execution exception: {join_error}"))
            }
        }
    }

    /// Trips the process-wide interrupt signal.
    ///
    /// Running actions see it at their next poll point; actions started
    /// afterwards see it immediately, until [`resume`](Self::resume).
    /// Returns `false` if the signal was already tripped.
    pub fn interrupt_all(&self, reason: &str) -> Result<bool, ContextError> {
        let base = self.contexts.context()?;
        let tripped = base.global_interrupt.interrupt(reason);
        info!(target: "runtime::executor", reason, tripped, "Interrupt requested for all actions");
        Ok(tripped)
    }

    /// Alias of [`interrupt_all`](Self::interrupt_all).
    pub fn interrupt(&self, reason: &str) -> Result<bool, ContextError> {
        self.interrupt_all(reason)
    }

    /// Clears the process-wide interrupt signal so new actions can run.
    pub fn resume(&self) -> Result<(), ContextError> {
        let base = self.contexts.context()?;
        base.global_interrupt.clear();
        info!(target: "runtime::executor", "Process-wide interrupt cleared");
        Ok(())
    }

    /// Registered actions in registration order.
    pub fn registered_actions(&self) -> Vec<Arc<dyn Action>> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn action(&self, id: &str) -> Option<Arc<dyn Action>> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn has_action(&self, id: &str) -> bool {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn context_manager(&self) -> &Arc<ContextManager> {
        &self.contexts
    }
}

/// Logs the outcome, emits the matching lifecycle event and builds the result.
fn conclude(
    events: &EventBus,
    id: &str,
    action_name: String,
    outcome: Result<Result<ActionResult, ActionError>, JoinError>,
    duration_ms: u64,
) -> ActionResult {
    match outcome {
        Ok(Ok(result)) => {
            info!(
                target: "runtime::executor",
                action_id = id,
                success = result.success,
                duration_ms,
                "Action completed"
            );
            events.emit(Event::ActionComplete(ActionCompleted {
                action_id: id.to_string(),
                action_name,
                result: result.clone(),
                duration_ms,
            }));
            result
        }
        Ok(Err(error)) => fail(events, id, action_name, error, duration_ms),
        Err(join_error) => {
            let error = if join_error.is_panic() {
                ActionError::Panicked(panic_message(join_error.into_panic().as_ref()))
            } else {
                ActionError::failed("action task was cancelled")
            };
            fail(events, id, action_name, error, duration_ms)
        }
    }
}

fn fail(
    events: &EventBus,
    id: &str,
    action_name: String,
    error: ActionError,
    duration_ms: u64,
) -> ActionResult {
    if error.is_interrupted() {
        info!(
            target: "runtime::executor",
            action_id = id,
            duration_ms,
            reason = %error,
            "Action interrupted"
        );
    } else {
        error!(
            target: "runtime::executor",
            action_id = id,
            duration_ms,
            error = ?error,
            "Action raised an error"
        );
    }

    let result = ActionResult::failure(format!("execution exception: {error}"));
    events.emit(Event::ActionError(ActionFailed {
        action_id: id.to_string(),
        action_name,
        error: Arc::new(error),
    }));
    result
}
