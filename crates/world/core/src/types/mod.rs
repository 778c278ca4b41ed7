//! Plain value types shared across crates.
mod block;
mod movement;
mod position;
mod telemetry;
mod waypoint;

pub use block::{BlockInfo, ContainerInfo, ItemStack};
pub use movement::{MoveOutcome, MovementGoal, PlaceOutcome};
pub use position::{BlockPos, Vec3};
pub use telemetry::{Dimension, TelemetrySnapshot};
pub use waypoint::Waypoint;
