use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use world_core::{LocationRegistry, Result, Waypoint};

/// Location registry that lives only as long as the process.
///
/// `save` and `load` are no-ops; `load` reports the current count.
#[derive(Default)]
pub struct InMemoryLocationRegistry {
    waypoints: RwLock<BTreeMap<String, Waypoint>>,
}

impl InMemoryLocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_waypoints(waypoints: impl IntoIterator<Item = Waypoint>) -> Self {
        let map = waypoints
            .into_iter()
            .map(|waypoint| (waypoint.name.clone(), waypoint))
            .collect();
        Self {
            waypoints: RwLock::new(map),
        }
    }
}

impl LocationRegistry for InMemoryLocationRegistry {
    fn set(&self, waypoint: Waypoint) -> Result<Option<Waypoint>> {
        Ok(self
            .waypoints
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(waypoint.name.clone(), waypoint))
    }

    fn get(&self, name: &str) -> Result<Option<Waypoint>> {
        Ok(self
            .waypoints
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned())
    }

    fn remove(&self, name: &str) -> Result<Option<Waypoint>> {
        Ok(self
            .waypoints
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name))
    }

    fn list(&self) -> Result<Vec<Waypoint>> {
        Ok(self
            .waypoints
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect())
    }

    fn save(&self) -> Result<()> {
        Ok(())
    }

    fn load(&self) -> Result<usize> {
        Ok(self
            .waypoints
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len())
    }
}
