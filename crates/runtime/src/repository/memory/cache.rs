use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use world_core::{BlockPos, CacheEntry, SpatialCache};

/// Spatial cache backed by a `HashMap`.
///
/// Each call takes the lock once, so individual operations are atomic but a
/// read-then-write sequence by one action can interleave with another's.
pub struct InMemorySpatialCache<T> {
    entries: RwLock<HashMap<BlockPos, T>>,
}

impl<T> InMemorySpatialCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> Default for InMemorySpatialCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CacheEntry> SpatialCache<T> for InMemorySpatialCache<T> {
    fn get(&self, pos: BlockPos) -> Option<T> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&pos)
            .cloned()
    }

    fn set(&self, pos: BlockPos, info: T) -> Option<T> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pos, info)
    }

    fn remove(&self, pos: BlockPos) -> Option<T> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&pos)
    }

    fn query_by_radius(&self, center: BlockPos, radius: f64) -> Vec<(BlockPos, T)> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut hits: Vec<(f64, BlockPos, T)> = entries
            .iter()
            .filter_map(|(pos, info)| {
                let distance = center.distance_to(*pos);
                (distance <= radius).then(|| (distance, *pos, info.clone()))
            })
            .collect();
        drop(entries);

        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        hits.into_iter().map(|(_, pos, info)| (pos, info)).collect()
    }

    fn query_by_name(&self, name: &str) -> Vec<(BlockPos, T)> {
        let mut hits: Vec<(BlockPos, T)> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, info)| info.name() == name)
            .map(|(pos, info)| (*pos, info.clone()))
            .collect();
        hits.sort_by_key(|(pos, _)| *pos);
        hits
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use world_core::{BlockInfo, ContainerInfo, ItemStack};

    fn block(name: &str) -> BlockInfo {
        BlockInfo::new(name, true)
    }

    #[test]
    fn set_replaces_and_returns_previous() {
        let cache = InMemorySpatialCache::new();
        let pos = BlockPos::new(1, 64, 1);

        assert!(cache.set(pos, block("stone")).is_none());
        let previous = cache.set(pos, block("dirt")).unwrap();

        assert_eq!(previous.name, "stone");
        assert_eq!(cache.get(pos).unwrap().name, "dirt");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn radius_query_is_sorted_nearest_first() {
        let cache = InMemorySpatialCache::new();
        let origin = BlockPos::new(0, 64, 0);
        cache.set(origin.offset(5, 0, 0), block("far"));
        cache.set(origin.offset(1, 0, 0), block("near"));
        cache.set(origin.offset(50, 0, 0), block("outside"));

        let hits = cache.query_by_radius(origin, 10.0);
        let names: Vec<&str> = hits.iter().map(|(_, b)| b.name.as_str()).collect();
        assert_eq!(names, vec!["near", "far"]);
    }

    #[test]
    fn name_query_matches_exactly() {
        let cache = InMemorySpatialCache::new();
        cache.set(
            BlockPos::new(3, 70, 3),
            ContainerInfo::new("chest", vec![ItemStack::new("oak_log", 12)]),
        );
        cache.set(BlockPos::new(0, 70, 0), ContainerInfo::new("barrel", vec![]));

        let chests = cache.query_by_name("chest");
        assert_eq!(chests.len(), 1);
        assert_eq!(chests[0].1.count_of("oak_log"), 12);
        assert!(cache.query_by_name("ches").is_empty());
    }

    #[test]
    fn clear_and_remove() {
        let cache = InMemorySpatialCache::new();
        let pos = BlockPos::new(0, 0, 0);
        cache.set(pos, block("stone"));
        cache.set(pos.offset(0, 1, 0), block("stone"));

        assert!(cache.remove(pos).is_some());
        assert!(cache.remove(pos).is_none());
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.flush().is_ok());
    }
}
