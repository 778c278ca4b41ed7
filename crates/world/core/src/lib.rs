//! Shared world types and collaborator contracts.
//!
//! `world-core` describes everything an action can touch in the live world
//! without saying how it is implemented: block coordinates, cached block and
//! container observations, named waypoints, telemetry snapshots, and the
//! traits for caches, the location registry, movement, placement, and chat.
//! The runtime threads `Arc<dyn Trait>` handles of these through every action
//! context.
pub mod error;
pub mod traits;
pub mod types;

pub use error::{Result, WorldError};
pub use traits::{
    BlockPlacer, CacheEntry, ChatChannel, LocationRegistry, Navigator, SpatialCache,
    TelemetrySource,
};
pub use types::{
    BlockInfo, BlockPos, ContainerInfo, Dimension, ItemStack, MoveOutcome, MovementGoal,
    PlaceOutcome, TelemetrySnapshot, Vec3, Waypoint,
};
