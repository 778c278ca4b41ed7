use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::Vec3;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    #[default]
    Overworld,
    Nether,
    End,
}

/// Read-only snapshot of the agent and its surroundings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub username: String,
    pub connected: bool,
    pub position: Vec3,
    pub dimension: Dimension,
    pub health: f32,
    pub food: u8,
    /// World time in ticks (0..24000).
    pub time_of_day: u64,
}

impl TelemetrySnapshot {
    pub const MAX_HEALTH: f32 = 20.0;

    pub fn offline(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            connected: false,
            position: Vec3::default(),
            dimension: Dimension::Overworld,
            health: Self::MAX_HEALTH,
            food: 20,
            time_of_day: 0,
        }
    }

    pub fn is_night(&self) -> bool {
        (13_000..23_000).contains(&self.time_of_day)
    }
}
