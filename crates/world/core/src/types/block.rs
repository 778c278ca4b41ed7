use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::CacheEntry;

/// Last observed state of a single block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub name: String,
    pub solid: bool,
    pub last_seen: DateTime<Utc>,
}

impl BlockInfo {
    pub fn new(name: impl Into<String>, solid: bool) -> Self {
        Self {
            name: name.into(),
            solid,
            last_seen: Utc::now(),
        }
    }
}

impl CacheEntry for BlockInfo {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub name: String,
    pub count: u32,
}

impl ItemStack {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Last observed contents of a container block (chest, barrel, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContainerInfo {
    /// Block name of the container itself.
    pub name: String,
    pub items: Vec<ItemStack>,
    pub last_seen: DateTime<Utc>,
}

impl ContainerInfo {
    pub fn new(name: impl Into<String>, items: Vec<ItemStack>) -> Self {
        Self {
            name: name.into(),
            items,
            last_seen: Utc::now(),
        }
    }

    /// Total count of an item across all stacks.
    pub fn count_of(&self, item: &str) -> u32 {
        self.items
            .iter()
            .filter(|stack| stack.name == item)
            .map(|stack| stack.count)
            .sum()
    }
}

impl CacheEntry for ContainerInfo {
    fn name(&self) -> &str {
        &self.name
    }
}
