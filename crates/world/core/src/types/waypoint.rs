use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BlockPos, Dimension};

/// A named location remembered by the agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    pub pos: BlockPos,
    #[serde(default)]
    pub dimension: Dimension,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Waypoint {
    pub fn new(name: impl Into<String>, pos: BlockPos, dimension: Dimension) -> Self {
        Self {
            name: name.into(),
            pos,
            dimension,
            note: None,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
