//! Event payloads and topic names.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};
use world_core::{BlockPos, Vec3};

use crate::api::{ActionError, ActionResult};

/// Event names. The string form matches the names used by the world session
/// (`health`, `blockUpdate`, `end`, ...) plus the two lifecycle events.
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Display, EnumString, IntoStaticStr, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "camelCase")]
pub enum Topic {
    Spawn,
    Health,
    Death,
    Chat,
    BlockUpdate,
    Kicked,
    /// Connection closed.
    End,
    Error,
    ActionComplete,
    ActionError,
}

impl Topic {
    /// True for the executor's synthetic events.
    pub const fn is_lifecycle(self) -> bool {
        matches!(self, Topic::ActionComplete | Topic::ActionError)
    }
}

/// Events re-broadcast from the world session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum WorldEvent {
    Spawn {
        position: Vec3,
    },
    Health {
        health: f32,
        food: u8,
    },
    Death,
    Chat {
        username: String,
        message: String,
    },
    BlockUpdate {
        pos: BlockPos,
        /// New block name, `None` when the block became air.
        block: Option<String>,
    },
    Kicked {
        reason: String,
    },
    End {
        reason: String,
    },
    Error {
        message: String,
    },
}

impl WorldEvent {
    pub fn topic(&self) -> Topic {
        match self {
            WorldEvent::Spawn { .. } => Topic::Spawn,
            WorldEvent::Health { .. } => Topic::Health,
            WorldEvent::Death => Topic::Death,
            WorldEvent::Chat { .. } => Topic::Chat,
            WorldEvent::BlockUpdate { .. } => Topic::BlockUpdate,
            WorldEvent::Kicked { .. } => Topic::Kicked,
            WorldEvent::End { .. } => Topic::End,
            WorldEvent::Error { .. } => Topic::Error,
        }
    }
}

/// `actionComplete`: the action returned normally (successfully or not).
#[derive(Debug, Clone)]
pub struct ActionCompleted {
    pub action_id: String,
    pub action_name: String,
    pub result: ActionResult,
    pub duration_ms: u64,
}

/// `actionError`: the action returned `Err` or panicked.
#[derive(Debug, Clone)]
pub struct ActionFailed {
    pub action_id: String,
    pub action_name: String,
    /// The original error value.
    pub error: Arc<ActionError>,
}

/// Event wrapper that carries the typed payload.
#[derive(Debug, Clone)]
pub enum Event {
    World(WorldEvent),
    ActionComplete(ActionCompleted),
    ActionError(ActionFailed),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::World(event) => event.topic(),
            Event::ActionComplete(_) => Topic::ActionComplete,
            Event::ActionError(_) => Topic::ActionError,
        }
    }
}

impl From<WorldEvent> for Event {
    fn from(event: WorldEvent) -> Self {
        Event::World(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn topic_names_round_trip() {
        assert_eq!(Topic::BlockUpdate.as_ref(), "blockUpdate");
        assert_eq!(Topic::ActionComplete.to_string(), "actionComplete");
        assert_eq!(Topic::from_str("actionError").unwrap(), Topic::ActionError);

        for topic in Topic::iter() {
            assert_eq!(Topic::from_str(topic.as_ref()).unwrap(), topic);
        }
    }

    #[test]
    fn world_events_map_to_their_topic() {
        let chat = WorldEvent::Chat {
            username: "alex".into(),
            message: "hi".into(),
        };
        assert_eq!(Event::from(chat).topic(), Topic::Chat);
        assert!(!Topic::Chat.is_lifecycle());
        assert!(Topic::ActionError.is_lifecycle());
    }
}
