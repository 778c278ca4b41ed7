use crate::error::Result;
use crate::types::Waypoint;

/// Named-waypoint storage with explicit persistence.
///
/// Mutations only touch memory; `save()` writes them out and `load()`
/// replaces the in-memory set with whatever was last saved.
pub trait LocationRegistry: Send + Sync {
    /// Inserts or replaces a waypoint, returning the previous one.
    fn set(&self, waypoint: Waypoint) -> Result<Option<Waypoint>>;

    fn get(&self, name: &str) -> Result<Option<Waypoint>>;

    fn remove(&self, name: &str) -> Result<Option<Waypoint>>;

    /// All waypoints ordered by name.
    fn list(&self) -> Result<Vec<Waypoint>>;

    fn save(&self) -> Result<()>;

    /// Reloads from storage and returns the number of waypoints read.
    fn load(&self) -> Result<usize>;
}
