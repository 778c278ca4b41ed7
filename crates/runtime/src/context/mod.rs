//! Execution contexts handed to actions.
//!
//! The [`ContextManager`] owns one long-lived base [`ActionContext`] holding
//! the shared collaborators, and derives a fresh per-invocation copy for each
//! `execute()` call: same collaborators, new [`InterruptSignal`], and a logger
//! prefixed with the action's name.
//!
//! [`InterruptSignal`]: crate::InterruptSignal

mod action_context;
mod config;
mod logger;
mod manager;
mod params;

pub use action_context::ActionContext;
pub use config::ConfigBag;
pub use logger::ActionLogger;
pub use manager::ContextManager;
pub use params::ContextParams;
