//! Offline stand-in for a live game connection.
//!
//! [`SimulatedWorld`] implements every world collaborator so the agent can
//! be exercised without a server: movement takes time proportional to the
//! distance walked, placement is limited by reach, and chat is echoed back
//! as a world `chat` event. Walking also costs food, which is reported only as
//! a `health` world event; the telemetry sees it once
//! [`SharedTelemetry::attach`] follows the bus those events reach.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use runtime::{SharedTelemetry, WorldEvent};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use world_core::{
    BlockPlacer, BlockPos, ChatChannel, MoveOutcome, MovementGoal, Navigator, PlaceOutcome,
    TelemetrySnapshot, TelemetrySource, Vec3, WorldError,
};

/// How far away a block can be placed from.
pub const REACH: f64 = 4.5;

/// Walking speed in blocks per second.
const DEFAULT_SPEED: f64 = 20.0;

/// Distance walked per food point.
const BLOCKS_PER_FOOD: f64 = 16.0;

pub struct SimulatedWorld {
    telemetry: SharedTelemetry,
    speed: f64,
    events: Mutex<Option<mpsc::Sender<WorldEvent>>>,
}

impl SimulatedWorld {
    pub fn new(username: &str) -> Self {
        Self {
            telemetry: SharedTelemetry::new(TelemetrySnapshot::offline(username)),
            speed: DEFAULT_SPEED,
            events: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_speed(mut self, blocks_per_second: f64) -> Self {
        self.speed = blocks_per_second.max(f64::MIN_POSITIVE);
        self
    }

    pub fn telemetry(&self) -> &SharedTelemetry {
        &self.telemetry
    }

    /// Starts publishing world events to `tx` and spawns the agent at `at`.
    pub fn connect(&self, tx: mpsc::Sender<WorldEvent>, at: Vec3) {
        *self.events.lock().unwrap_or_else(PoisonError::into_inner) = Some(tx);
        self.telemetry.update(|snapshot| {
            snapshot.connected = true;
            snapshot.position = at;
        });
        self.publish(WorldEvent::Spawn { position: at });
        info!(target: "world::sim", position = %at, "Simulated world connected");
    }

    pub fn disconnect(&self, reason: &str) {
        self.telemetry.update(|snapshot| snapshot.connected = false);
        self.publish(WorldEvent::End {
            reason: reason.to_string(),
        });
        *self.events.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn publish(&self, event: WorldEvent) {
        let sender = self
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(tx) = sender {
            if let Err(e) = tx.try_send(event) {
                warn!(target: "world::sim", error = %e, "Dropped world event");
            }
        }
    }

    fn exhaust(&self, walked: f64) {
        // Float to int casts saturate.
        let spent = (walked / BLOCKS_PER_FOOD) as u8;
        if spent == 0 {
            return;
        }
        let snapshot = self.telemetry.snapshot();
        self.publish(WorldEvent::Health {
            health: snapshot.health,
            food: snapshot.food.saturating_sub(spent),
        });
    }

    fn ensure_connected(&self) -> world_core::Result<TelemetrySnapshot> {
        let snapshot = self.telemetry.snapshot();
        if !snapshot.connected {
            return Err(WorldError::NotConnected);
        }
        Ok(snapshot)
    }
}

impl TelemetrySource for SimulatedWorld {
    fn snapshot(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }
}

#[async_trait]
impl ChatChannel for SimulatedWorld {
    async fn send_chat(&self, message: &str) -> world_core::Result<()> {
        let snapshot = self.ensure_connected()?;
        info!(target: "world::sim", "<{}> {}", snapshot.username, message);
        self.publish(WorldEvent::Chat {
            username: snapshot.username,
            message: message.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl Navigator for SimulatedWorld {
    async fn go_to(&self, goal: MovementGoal) -> world_core::Result<MoveOutcome> {
        let start = self.ensure_connected()?.position;
        let target = goal.target().center();

        let remaining = start.distance_to(target);
        let walk = (remaining - goal.tolerance()).max(0.0);
        debug!(target: "world::sim", %start, %target, walk, "Walking");
        tokio::time::sleep(Duration::from_secs_f64(walk / self.speed)).await;

        // Stop `tolerance` short along the straight line.
        let arrived = if remaining > 0.0 && walk < remaining {
            let t = walk / remaining;
            Vec3::new(
                start.x + (target.x - start.x) * t,
                start.y + (target.y - start.y) * t,
                start.z + (target.z - start.z) * t,
            )
        } else {
            target
        };
        self.telemetry.update(|snapshot| snapshot.position = arrived);
        self.exhaust(walk);

        Ok(MoveOutcome {
            success: true,
            distance: arrived.distance_to(target),
            final_position: arrived,
        })
    }

    fn stop(&self) {
        debug!(target: "world::sim", "Navigation stopped");
    }
}

#[async_trait]
impl BlockPlacer for SimulatedWorld {
    async fn place_block(&self, pos: BlockPos, block: &str) -> world_core::Result<PlaceOutcome> {
        let position = self.ensure_connected()?.position;
        let distance = position.distance_to(pos.center());
        if distance > REACH {
            return Err(WorldError::PlacementFailed {
                pos,
                reason: format!("out of reach ({distance:.1} > {REACH})"),
            });
        }

        self.publish(WorldEvent::BlockUpdate {
            pos,
            block: Some(block.to_string()),
        });
        Ok(PlaceOutcome {
            success: true,
            distance,
            final_position: position,
            block: block.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runtime::EventBus;

    fn connected() -> (SimulatedWorld, mpsc::Receiver<WorldEvent>) {
        let world = SimulatedWorld::new("sim").with_speed(10_000.0);
        let (tx, rx) = mpsc::channel(16);
        world.connect(tx, Vec3::new(0.5, 64.0, 0.5));
        (world, rx)
    }

    #[tokio::test]
    async fn connect_publishes_spawn() {
        let (world, mut rx) = connected();
        assert!(world.snapshot().connected);
        assert!(matches!(rx.recv().await, Some(WorldEvent::Spawn { .. })));
    }

    #[tokio::test]
    async fn offline_world_refuses_requests() {
        let world = SimulatedWorld::new("sim");
        assert!(matches!(
            world.send_chat("hi").await,
            Err(WorldError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn walking_respects_tolerance() {
        let (world, _rx) = connected();
        let outcome = world
            .go_to(MovementGoal::Near {
                pos: BlockPos::new(20, 64, 0),
                range: 5.0,
            })
            .await
            .unwrap();

        assert!(outcome.success);
        assert!((outcome.distance - 5.0).abs() < 1e-6);
        assert_eq!(world.snapshot().position, outcome.final_position);
    }

    #[tokio::test]
    async fn placement_is_limited_by_reach() {
        let (world, _rx) = connected();

        let near = world.place_block(BlockPos::new(2, 64, 0), "torch").await;
        assert!(near.is_ok());

        let far = world.place_block(BlockPos::new(30, 64, 0), "torch").await;
        assert!(matches!(far, Err(WorldError::PlacementFailed { .. })));
    }

    #[tokio::test]
    async fn walking_costs_food_through_the_bus() {
        let world = SimulatedWorld::new("sim").with_speed(10_000.0);
        let bus = EventBus::new();
        world.telemetry().attach(&bus);
        let (tx, rx) = mpsc::channel(16);
        let _bridge = bus.bridge(rx);
        world.connect(tx, Vec3::new(0.5, 64.0, 0.5));

        world
            .go_to(MovementGoal::Near {
                pos: BlockPos::new(40, 64, 0),
                range: 0.0,
            })
            .await
            .unwrap();

        tokio::time::timeout(Duration::from_secs(1), async {
            while world.snapshot().food != 18 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
        assert_eq!(world.snapshot().health, TelemetrySnapshot::MAX_HEALTH);
    }

    #[tokio::test]
    async fn chat_is_echoed_as_world_event() {
        let (world, mut rx) = connected();
        let _spawn = rx.recv().await;

        world.send_chat("hello").await.unwrap();
        match rx.recv().await {
            Some(WorldEvent::Chat { username, message }) => {
                assert_eq!(username, "sim");
                assert_eq!(message, "hello");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
