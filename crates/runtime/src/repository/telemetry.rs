//! Telemetry kept current from world events.

use std::sync::{Arc, PoisonError, RwLock};

use world_core::{TelemetrySnapshot, TelemetrySource};

use crate::events::{Event, EventBus, ListenerHandle, Topic, WorldEvent};

/// Last known agent status, updated in place.
///
/// A world adapter can write to it directly through [`update`](Self::update),
/// or let [`attach`](Self::attach) follow `spawn`, `health`, `death`,
/// `kicked` and `end` on an event bus.
#[derive(Clone)]
pub struct SharedTelemetry {
    snapshot: Arc<RwLock<TelemetrySnapshot>>,
}

impl SharedTelemetry {
    pub fn new(initial: TelemetrySnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn update(&self, apply: impl FnOnce(&mut TelemetrySnapshot)) {
        apply(
            &mut self
                .snapshot
                .write()
                .unwrap_or_else(PoisonError::into_inner),
        );
    }

    /// Follows world events on `bus`. Dropping the returned handles does not
    /// detach; call `remove()` on them for that.
    pub fn attach(&self, bus: &EventBus) -> Vec<ListenerHandle> {
        [
            Topic::Spawn,
            Topic::Health,
            Topic::Death,
            Topic::Kicked,
            Topic::End,
        ]
        .into_iter()
        .map(|topic| {
            let telemetry = self.clone();
            bus.on(topic, move |event| {
                if let Event::World(world) = event {
                    telemetry.apply(world);
                }
                Ok(())
            })
        })
        .collect()
    }

    fn apply(&self, event: &WorldEvent) {
        self.update(|snapshot| match event {
            WorldEvent::Spawn { position } => {
                snapshot.connected = true;
                snapshot.position = *position;
                snapshot.health = TelemetrySnapshot::MAX_HEALTH;
            }
            WorldEvent::Health { health, food } => {
                snapshot.health = *health;
                snapshot.food = *food;
            }
            WorldEvent::Death => snapshot.health = 0.0,
            WorldEvent::Kicked { .. } | WorldEvent::End { .. } => snapshot.connected = false,
            _ => {}
        });
    }
}

impl TelemetrySource for SharedTelemetry {
    fn snapshot(&self) -> TelemetrySnapshot {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use world_core::Vec3;

    #[test]
    fn follows_world_events() {
        let bus = EventBus::new();
        let telemetry = SharedTelemetry::new(TelemetrySnapshot::offline("steve"));
        let handles = telemetry.attach(&bus);

        bus.emit(WorldEvent::Spawn {
            position: Vec3::new(1.5, 64.0, -3.5),
        });
        bus.emit(WorldEvent::Health {
            health: 7.0,
            food: 4,
        });

        let snapshot = telemetry.snapshot();
        assert!(snapshot.connected);
        assert_eq!(snapshot.position, Vec3::new(1.5, 64.0, -3.5));
        assert_eq!(snapshot.health, 7.0);
        assert_eq!(snapshot.food, 4);

        bus.emit(WorldEvent::End {
            reason: "socket closed".into(),
        });
        assert!(!telemetry.snapshot().connected);

        for handle in handles {
            handle.remove();
        }
        bus.emit(WorldEvent::Spawn {
            position: Vec3::default(),
        });
        assert!(!telemetry.snapshot().connected);
    }

    #[test]
    fn direct_updates_are_visible_to_clones() {
        let telemetry = SharedTelemetry::new(TelemetrySnapshot::offline("steve"));
        let reader = telemetry.clone();
        telemetry.update(|s| s.time_of_day = 18_000);
        assert!(reader.snapshot().is_night());
    }
}
