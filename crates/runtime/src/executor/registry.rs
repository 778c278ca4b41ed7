//! Id-keyed action registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::api::Action;

/// Registered actions keyed by id, iterated in first-registration order.
///
/// Re-registering an id replaces the action in place and keeps its slot in
/// the ordering, so generated prompts stay stable across hot reloads.
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Arc<dyn Action>>,
    order: Vec<String>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `action`, returning the one it replaced.
    pub fn insert(&mut self, action: Arc<dyn Action>) -> Option<Arc<dyn Action>> {
        let id = action.id().to_string();
        let previous = self.actions.insert(id.clone(), action);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Action>> {
        self.actions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    /// Actions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Action>> + '_ {
        self.order.iter().filter_map(|id| self.actions.get(id))
    }
}
