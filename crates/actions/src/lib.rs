//! Built-in actions for the agent.
//!
//! Every action here is a [`TypedAction`](runtime::TypedAction): parameters
//! are decoded into a struct, checked by the action's own `validate`, and
//! only then run. Expected failures (unknown waypoint, occupied block,
//! unreachable target) come back as failed results; world errors and
//! interrupts propagate as `Err` and are handled by the executor.
//!
//! [`default_actions`] returns the full set ready for registration.

mod blocks;
mod chat;
mod movement;
mod wait;
mod waypoints;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use runtime::{Action, typed};

pub use blocks::{FindBlock, PlaceBlock};
pub use chat::{Chat, MAX_CHAT_LENGTH};
pub use movement::GoTo;
pub use wait::Wait;
pub use waypoints::{GoToWaypoint, ListWaypoints, SetWaypoint};

/// All built-in actions in prompt order.
pub fn default_actions() -> Vec<Arc<dyn Action>> {
    vec![
        typed(Chat),
        typed(Wait),
        typed(GoTo),
        typed(SetWaypoint),
        typed(GoToWaypoint),
        typed(ListWaypoints),
        typed(FindBlock),
        typed(PlaceBlock),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::harness;
    use std::collections::HashSet;

    #[test]
    fn default_action_ids_are_unique() {
        let actions = default_actions();
        let ids: HashSet<&str> = actions.iter().map(|a| a.id()).collect();
        assert_eq!(ids.len(), actions.len());
        assert!(ids.contains("chat"));
        assert!(ids.contains("place_block"));
    }

    #[tokio::test]
    async fn categorized_prompt_groups_default_actions() {
        let (_world, runtime) = harness(default_actions()).await;
        let prompt = runtime.prompts().generate_categorized_prompt(None);

        let social = prompt.find("## social").unwrap();
        let movement = prompt.find("## movement").unwrap();
        let general = prompt.find("## general").unwrap();
        assert!(social < movement && movement < general);
        assert!(prompt.find("- wait (Wait)").unwrap() > general);
    }
}
