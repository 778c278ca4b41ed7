//! Default implementations of the world-side storage collaborators.
//!
//! The base context falls back to the in-memory variants when the caller
//! supplies no cache or location registry. [`FileLocationRegistry`] keeps
//! waypoints across sessions, and [`SharedTelemetry`] tracks the agent's
//! status from world events.

mod file;
mod memory;
mod telemetry;

pub use file::FileLocationRegistry;
pub use memory::{InMemoryLocationRegistry, InMemorySpatialCache};
pub use telemetry::SharedTelemetry;
