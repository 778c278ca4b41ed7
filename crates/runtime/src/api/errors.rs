//! Error types surfaced by the runtime API.
//!
//! Two families live here and they are handled very differently:
//! - [`ActionError`] is whatever an action's `execute` fails with. The
//!   executor never lets it escape; it becomes a failed `ActionResult` and an
//!   `actionError` event.
//! - [`ContextError`] and [`RuntimeError`] describe misuse of the framework
//!   itself (building the base context twice, using it before it exists).
//!   These are returned to the caller as `Err`.

use thiserror::Error;
use world_core::WorldError;

use crate::interrupt::Interrupted;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Failure raised from inside an action implementation.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The action observed its interrupt signal at a poll point.
    #[error(transparent)]
    Interrupted(#[from] Interrupted),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("{0}")]
    Failed(String),

    /// The action panicked; the payload message is kept when it is a string.
    #[error("action panicked: {0}")]
    Panicked(String),
}

impl ActionError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted(_))
    }
}

/// Misuse of the context manager.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("base context already created")]
    AlreadyCreated,

    #[error("base context not created yet")]
    NotCreated,

    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("executor already installed on the base context")]
    ExecutorAlreadyInstalled,

    #[error("context manager lock was poisoned")]
    LockPoisoned,
}

/// Errors raised while assembling or tearing down a [`crate::Runtime`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Context(#[from] ContextError),
}
