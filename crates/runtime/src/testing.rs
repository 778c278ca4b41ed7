//! Stub world collaborators for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use world_core::{
    BlockPlacer, BlockPos, ChatChannel, MoveOutcome, MovementGoal, Navigator, PlaceOutcome,
    TelemetrySnapshot, TelemetrySource, Vec3,
};

use crate::context::ContextParams;

/// Teleports instantly and counts navigation stops.
#[derive(Default)]
pub(crate) struct StubWorld {
    pub stops: AtomicUsize,
}

impl TelemetrySource for StubWorld {
    fn snapshot(&self) -> TelemetrySnapshot {
        let mut snapshot = TelemetrySnapshot::offline("stub");
        snapshot.connected = true;
        snapshot
    }
}

#[async_trait]
impl ChatChannel for StubWorld {
    async fn send_chat(&self, _message: &str) -> world_core::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Navigator for StubWorld {
    async fn go_to(&self, goal: MovementGoal) -> world_core::Result<MoveOutcome> {
        Ok(MoveOutcome {
            success: true,
            distance: 0.0,
            final_position: goal.target().center(),
        })
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlockPlacer for StubWorld {
    async fn place_block(&self, pos: BlockPos, block: &str) -> world_core::Result<PlaceOutcome> {
        Ok(PlaceOutcome {
            success: true,
            distance: 1.0,
            final_position: Vec3::from(pos),
            block: block.to_string(),
        })
    }
}

pub(crate) fn stub_params() -> ContextParams {
    stub_params_with(Arc::new(StubWorld::default()))
}

pub(crate) fn stub_params_with(world: Arc<StubWorld>) -> ContextParams {
    ContextParams::new()
        .telemetry(world.clone())
        .chat(world.clone())
        .navigator(world.clone())
        .placer(world)
}
