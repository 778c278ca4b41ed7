//! File-backed location registry.
//!
//! Waypoints are kept in memory and written as a single JSON array:
//! ```text
//! {base_dir}/{session_id}/locations.json
//! ```
//! Mutations are only persisted by [`LocationRegistry::save`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::debug;
use world_core::{LocationRegistry, Result, Waypoint};

pub struct FileLocationRegistry {
    path: PathBuf,
    waypoints: RwLock<BTreeMap<String, Waypoint>>,
}

impl FileLocationRegistry {
    /// Opens the registry for `session_id`, loading any previously saved
    /// waypoints. The session directory is created if missing.
    pub fn open(base_dir: impl AsRef<Path>, session_id: &str) -> Result<Self> {
        let dir = base_dir.as_ref().join(session_id);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let registry = Self {
            path: dir.join("locations.json"),
            waypoints: RwLock::new(BTreeMap::new()),
        };
        registry.load()?;
        Ok(registry)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocationRegistry for FileLocationRegistry {
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
        let waypoints = self.list()?;
        let json = serde_json::to_string_pretty(&waypoints)?;

        // Replaced atomically via rename.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!(
            target: "runtime::repository",
            path = %self.path.display(),
            count = waypoints.len(),
            "Locations saved"
        );
        Ok(())
    }

    fn load(&self) -> Result<usize> {
        let loaded: Vec<Waypoint> = if self.path.exists() {
            serde_json::from_str(&fs::read_to_string(&self.path)?)?
        } else {
            Vec::new()
        };
        let count = loaded.len();

        *self
            .waypoints
            .write()
            .unwrap_or_else(PoisonError::into_inner) = loaded
            .into_iter()
            .map(|waypoint| (waypoint.name.clone(), waypoint))
            .collect();

        debug!(
            target: "runtime::repository",
            path = %self.path.display(),
            count,
            "Locations loaded"
        );
        Ok(count)
    }
}
