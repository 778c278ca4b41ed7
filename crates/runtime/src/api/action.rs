//! The action contract.

use async_trait::async_trait;

use super::{ActionError, ActionParams, ActionResult, ParamsSchema};
use crate::context::ActionContext;

/// A named, self-contained unit of work the agent can perform.
///
/// Only [`id`](Action::id), [`name`](Action::name),
/// [`description`](Action::description) and [`execute`](Action::execute) are
/// required; the rest have defaults.
///
/// # Failure
///
/// Expected failures (bad parameters, unreachable target, ...) should come
/// back as `Ok(ActionResult::failure(..))`. Returning `Err` or panicking is
/// also safe: [`crate::ActionExecutor::execute`] turns both into a failed
/// result and broadcasts the original error on the event bus.
///
/// # Cancellation
///
/// Long-running actions poll [`ActionContext::check_interrupted`] between
/// steps. Nothing preempts an action that does not.
#[async_trait]
pub trait Action: Send + Sync {
    /// Registry key. Must be unique within an executor.
    fn id(&self) -> &str;

    /// Human-readable name, also used as the log prefix.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Optional grouping tag used by categorized prompts.
    fn category(&self) -> Option<&str> {
        None
    }

    /// Checks parameters before running. The executor never calls this;
    /// actions and tool-call front-ends may.
    fn validate_params(&self, _params: &ActionParams) -> bool {
        true
    }

    /// Documentation for prompt generation only.
    fn params_schema(&self) -> ParamsSchema {
        ParamsSchema::default()
    }

    /// Whether the action should be offered in a prompt for this context.
    /// Advisory; it never gates execution.
    fn should_activate(&self, _ctx: &ActionContext) -> bool {
        true
    }

    async fn execute(
        &self,
        ctx: &ActionContext,
        params: ActionParams,
    ) -> Result<ActionResult, ActionError>;
}
