//! In-process world and runtime harness for action tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use runtime::{Action, ConfigBag, ContextParams, Runtime, RuntimeConfig};
use serde_json::Value;
use world_core::{
    BlockPlacer, BlockPos, ChatChannel, MoveOutcome, MovementGoal, Navigator, PlaceOutcome,
    TelemetrySnapshot, TelemetrySource, Vec3, WorldError,
};

/// Teleports to navigation targets after `travel_time`.
pub(crate) struct FakeWorld {
    pub position: Mutex<Vec3>,
    pub said: Mutex<Vec<String>>,
    pub placed: Mutex<Vec<(BlockPos, String)>>,
    pub unreachable: AtomicBool,
    pub travel_time: Mutex<Duration>,
    pub stops: AtomicUsize,
}

impl Default for FakeWorld {
    fn default() -> Self {
        Self {
            position: Mutex::new(Vec3::new(0.5, 64.0, 0.5)),
            said: Mutex::default(),
            placed: Mutex::default(),
            unreachable: AtomicBool::new(false),
            travel_time: Mutex::new(Duration::ZERO),
            stops: AtomicUsize::new(0),
        }
    }
}

impl FakeWorld {
    pub fn said(&self) -> Vec<String> {
        self.said.lock().unwrap().clone()
    }

    pub fn position(&self) -> Vec3 {
        *self.position.lock().unwrap()
    }
}

impl TelemetrySource for FakeWorld {
    fn snapshot(&self) -> TelemetrySnapshot {
        let mut snapshot = TelemetrySnapshot::offline("tester");
        snapshot.connected = true;
        snapshot.position = self.position();
        snapshot
    }
}

#[async_trait]
impl ChatChannel for FakeWorld {
    async fn send_chat(&self, message: &str) -> world_core::Result<()> {
        self.said.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

#[async_trait]
impl Navigator for FakeWorld {
    async fn go_to(&self, goal: MovementGoal) -> world_core::Result<MoveOutcome> {
        let travel_time = *self.travel_time.lock().unwrap();
        tokio::time::sleep(travel_time).await;

        if self.unreachable.load(Ordering::SeqCst) {
            return Err(WorldError::NavigationFailed("no path".into()));
        }
        let arrived = goal.target().center();
        *self.position.lock().unwrap() = arrived;
        Ok(MoveOutcome {
            success: true,
            distance: 0.0,
            final_position: arrived,
        })
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlockPlacer for FakeWorld {
    async fn place_block(&self, pos: BlockPos, block: &str) -> world_core::Result<PlaceOutcome> {
        self.placed.lock().unwrap().push((pos, block.to_string()));
        let position = self.position();
        Ok(PlaceOutcome {
            success: true,
            distance: position.distance_to(pos.center()),
            final_position: position,
            block: block.to_string(),
        })
    }
}

pub(crate) async fn harness(actions: Vec<Arc<dyn Action>>) -> (Arc<FakeWorld>, Runtime) {
    harness_with_config(actions, std::iter::empty::<(&str, Value)>()).await
}

pub(crate) async fn harness_with_config<'a>(
    actions: Vec<Arc<dyn Action>>,
    config: impl IntoIterator<Item = (&'a str, Value)>,
) -> (Arc<FakeWorld>, Runtime) {
    let world = Arc::new(FakeWorld::default());
    let params = ContextParams::new()
        .telemetry(world.clone())
        .chat(world.clone())
        .navigator(world.clone())
        .placer(world.clone())
        .config(config.into_iter().collect::<ConfigBag>());

    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            autosave_interval: None,
            ..RuntimeConfig::default()
        })
        .context(params)
        .actions(actions)
        .build()
        .await
        .unwrap();

    (world, runtime)
}
