mod cache;
mod locations;

pub use cache::InMemorySpatialCache;
pub use locations::InMemoryLocationRegistry;
