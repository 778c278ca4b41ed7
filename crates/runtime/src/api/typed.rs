//! Strongly-typed actions.
//!
//! [`TypedAction`] lets an action declare a concrete parameter struct. The
//! [`Typed`] adapter decodes the JSON parameters, runs the action's own
//! validation, and only then calls [`TypedAction::run`]. Decoding and
//! validation failures become a failed result, never an error, because they
//! are the caller's mistake rather than the action's.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{Action, ActionError, ActionParams, ActionResult, ParamsSchema};
use crate::context::ActionContext;

#[async_trait]
pub trait TypedAction: Send + Sync + 'static {
    type Params: DeserializeOwned + Send;

    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn category(&self) -> Option<&str> {
        None
    }

    fn params_schema(&self) -> ParamsSchema {
        ParamsSchema::default()
    }

    fn should_activate(&self, _ctx: &ActionContext) -> bool {
        true
    }

    /// Semantic checks on decoded parameters. `Err` carries the message
    /// returned to the caller.
    fn validate(&self, _params: &Self::Params) -> Result<(), String> {
        Ok(())
    }

    async fn run(
        &self,
        ctx: &ActionContext,
        params: Self::Params,
    ) -> Result<ActionResult, ActionError>;
}

/// Adapter exposing a [`TypedAction`] as a dynamically-dispatched [`Action`].
pub struct Typed<A>(pub A);

/// Wraps a typed action for registration.
pub fn typed<A: TypedAction>(action: A) -> Arc<dyn Action> {
    Arc::new(Typed(action))
}

#[async_trait]
impl<A: TypedAction> Action for Typed<A> {
    fn id(&self) -> &str {
        self.0.id()
    }

    fn name(&self) -> &str {
        self.0.name()
    }

    fn description(&self) -> &str {
        self.0.description()
    }

    fn category(&self) -> Option<&str> {
        self.0.category()
    }

    fn validate_params(&self, params: &ActionParams) -> bool {
        params
            .decode::<A::Params>()
            .is_ok_and(|decoded| self.0.validate(&decoded).is_ok())
    }

    fn params_schema(&self) -> ParamsSchema {
        self.0.params_schema()
    }

    fn should_activate(&self, ctx: &ActionContext) -> bool {
        self.0.should_activate(ctx)
    }

    async fn execute(
        &self,
        ctx: &ActionContext,
        params: ActionParams,
    ) -> Result<ActionResult, ActionError> {
        let decoded = match params.decode::<A::Params>() {
            Ok(decoded) => decoded,
            Err(e) => {
                ctx.logger.debug(format_args!("rejecting parameters: {e}"));
                return Ok(ActionResult::failure(format!(
                    "invalid parameters for {}: {e}",
                    self.0.id()
                )));
            }
        };

        if let Err(message) = self.0.validate(&decoded) {
            ctx.logger.debug(format_args!("validation failed: {message}"));
            return Ok(ActionResult::failure(message));
        }

        self.0.run(ctx, decoded).await
    }
}
