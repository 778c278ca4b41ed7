use async_trait::async_trait;

use crate::error::Result;
use crate::types::TelemetrySnapshot;

/// Live player/world state, read-only from the action's perspective.
pub trait TelemetrySource: Send + Sync {
    fn snapshot(&self) -> TelemetrySnapshot;
}

/// Outgoing chat for the world session.
#[async_trait]
pub trait ChatChannel: Send + Sync {
    async fn send_chat(&self, message: &str) -> Result<()>;
}
