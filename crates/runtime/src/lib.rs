//! Action coordination runtime for an embodied agent.
//!
//! This crate turns a set of registered actions into something a decision
//! loop can call safely. Every invocation goes through
//! [`ActionExecutor::execute`], which derives a fresh context, contains
//! errors and panics, times the call, and reports the outcome on the
//! [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`api`] holds the [`Action`] contract, params, results and errors
//! - [`executor`] dispatches and instruments invocations
//! - [`context`] owns the base context and derives per-action copies
//! - [`interrupt`] provides the cooperative cancellation signal
//! - [`events`] provides the topic-based event bus
//! - [`prompt`] projects the registry into tool descriptions
//! - [`repository`] supplies default cache, waypoint and telemetry stores
//! - [`runtime`] assembles everything behind [`Runtime::builder`]
pub mod api;
pub mod context;
pub mod events;
pub mod executor;
pub mod interrupt;
pub mod prompt;
pub mod repository;
pub mod runtime;

#[cfg(test)]
mod testing;

pub use api::{
    Action, ActionError, ActionParams, ActionResult, ContextError, ParamKind, ParamSpec,
    ParamsSchema, Result, RuntimeError, Typed, TypedAction, typed,
};
pub use context::{ActionContext, ActionLogger, ConfigBag, ContextManager, ContextParams};
pub use events::{
    ActionCompleted, ActionFailed, Event, EventBus, HandlerResult, ListenerHandle, Topic,
    WorldEvent,
};
pub use executor::{ActionExecutor, ActionRegistry};
pub use interrupt::{InterruptSignal, Interrupted};
pub use prompt::{ActionPromptGenerator, DEFAULT_CATEGORY, NO_ACTIONS_AVAILABLE};
pub use repository::{
    FileLocationRegistry, InMemoryLocationRegistry, InMemorySpatialCache, SharedTelemetry,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
