use serde::{Deserialize, Serialize};

use super::{BlockPos, Vec3};

/// Where a navigation request should end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MovementGoal {
    /// Stand on the given block.
    Block { pos: BlockPos },
    /// Get within `range` blocks of `pos`.
    Near { pos: BlockPos, range: f64 },
}

impl MovementGoal {
    pub fn target(&self) -> BlockPos {
        match self {
            MovementGoal::Block { pos } | MovementGoal::Near { pos, .. } => *pos,
        }
    }

    /// Acceptable distance from the target once navigation ends.
    pub fn tolerance(&self) -> f64 {
        match self {
            MovementGoal::Block { .. } => 1.0,
            MovementGoal::Near { range, .. } => *range,
        }
    }
}

/// Result of a navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub success: bool,
    /// Remaining distance to the goal target.
    pub distance: f64,
    pub final_position: Vec3,
}

/// Result of a block placement request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaceOutcome {
    pub success: bool,
    /// Distance between the agent and the placed block.
    pub distance: f64,
    pub final_position: Vec3,
    pub block: String,
}
