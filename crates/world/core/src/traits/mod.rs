//! Collaborator contracts consumed by actions through their context.
//!
//! Every trait is object-safe and `Send + Sync` so the runtime can hold them
//! as `Arc<dyn Trait>` and share one instance across concurrent invocations.
//! None of them promise transactional isolation: readers and writers
//! interleave at the granularity of individual calls.
mod cache;
mod locations;
mod movement;
mod telemetry;

pub use cache::{CacheEntry, SpatialCache};
pub use locations::LocationRegistry;
pub use movement::{BlockPlacer, Navigator};
pub use telemetry::{ChatChannel, TelemetrySource};
