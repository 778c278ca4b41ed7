use async_trait::async_trait;

use crate::error::Result;
use crate::types::{BlockPos, MoveOutcome, MovementGoal, PlaceOutcome};

/// Goal-directed navigation.
///
/// Navigation runs until the goal is reached or abandoned. Callers that want
/// to give up early race the future against their interrupt signal and then
/// call [`Navigator::stop`].
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn go_to(&self, goal: MovementGoal) -> Result<MoveOutcome>;

    /// Halts any navigation in progress.
    fn stop(&self);
}

/// Block placement helper.
#[async_trait]
pub trait BlockPlacer: Send + Sync {
    async fn place_block(&self, pos: BlockPos, block: &str) -> Result<PlaceOutcome>;
}
