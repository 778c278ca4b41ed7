//! Errors raised by world collaborators.
//!
//! Every trait in [`crate::traits`] reports failures through [`WorldError`].
//! Actions usually turn these into a failed `ActionResult`; when they bubble
//! up with `?` the executor's exception boundary does the conversion instead.

use crate::types::BlockPos;

/// Errors surfaced by caches, registries, and movement helpers.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The world session is not connected.
    #[error("world session is not connected")]
    NotConnected,

    /// Navigation gave up before reaching the goal.
    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    /// A block could not be placed at the requested position.
    #[error("cannot place block at {pos}: {reason}")]
    PlacementFailed { pos: BlockPos, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WorldError>;
