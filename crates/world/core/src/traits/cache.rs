use crate::error::Result;
use crate::types::BlockPos;

/// Value stored in a [`SpatialCache`]; the name drives `query_by_name`.
pub trait CacheEntry: Clone + Send + Sync + 'static {
    fn name(&self) -> &str;
}

/// Position-indexed cache of world observations.
pub trait SpatialCache<T: CacheEntry>: Send + Sync {
    fn get(&self, pos: BlockPos) -> Option<T>;

    /// Stores `info` at `pos`, returning the previous entry.
    fn set(&self, pos: BlockPos, info: T) -> Option<T>;

    fn remove(&self, pos: BlockPos) -> Option<T>;

    /// Entries within `radius` blocks of `center`, nearest first.
    fn query_by_radius(&self, center: BlockPos, radius: f64) -> Vec<(BlockPos, T)>;

    /// Entries whose name matches exactly.
    fn query_by_name(&self, name: &str) -> Vec<(BlockPos, T)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry.
    fn clear(&self);

    /// Persists or releases buffered state. In-memory caches have nothing to do.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
