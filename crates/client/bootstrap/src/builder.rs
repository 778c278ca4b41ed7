//! Builds the runtime, world, and storage used by the agent binary.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use runtime::{Action, ContextParams, FileLocationRegistry, Runtime};
use world_core::{LocationRegistry, Vec3};

use crate::config::AgentConfig;
use crate::world::SimulatedWorld;

/// Where the simulated agent appears.
const SPAWN: Vec3 = Vec3::new(0.5, 64.0, 0.5);

/// Builder that assembles the runtime and its collaborators.
pub struct AgentBuilder {
    config: AgentConfig,
    actions: Vec<Arc<dyn Action>>,
}

impl AgentBuilder {
    /// Starts with the built-in action set.
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            actions: agent_actions::default_actions(),
        }
    }

    /// Registers an extra action, replacing a built-in one with the same id.
    pub fn action(mut self, action: Arc<dyn Action>) -> Self {
        self.actions.push(action);
        self
    }

    pub async fn build(self) -> Result<AgentSetup> {
        let session_id = self.config.resolved_session_id();
        let data_dir = self.config.resolved_data_dir();

        let locations = FileLocationRegistry::open(&data_dir, &session_id)
            .with_context(|| format!("cannot open locations under {}", data_dir.display()))?;
        tracing::info!(
            count = locations.list()?.len(),
            path = %locations.path().display(),
            "Location registry opened"
        );

        let world = Arc::new(SimulatedWorld::new(&self.config.username));
        let params = ContextParams::new()
            .telemetry(world.clone())
            .chat(world.clone())
            .navigator(world.clone())
            .placer(world.clone())
            .locations(Arc::new(locations))
            .config(self.config.config_bag());

        let runtime = Runtime::builder()
            .config(self.config.runtime_config())
            .context(params)
            .actions(self.actions)
            .build()
            .await?;

        world.telemetry().attach(runtime.events());
        if let Some(tx) = runtime.world_sender() {
            world.connect(tx, SPAWN);
        }

        Ok(AgentSetup {
            config: self.config,
            session_id,
            data_dir,
            world,
            runtime,
        })
    }
}

pub struct AgentSetup {
    pub config: AgentConfig,
    pub session_id: String,
    pub data_dir: PathBuf,
    pub world: Arc<SimulatedWorld>,
    pub runtime: Runtime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use runtime::WorldEvent;
    use serde_json::json;
    use world_core::TelemetrySource;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> AgentConfig {
        AgentConfig {
            session_id: Some("test".to_string()),
            data_dir: Some(dir.path().to_path_buf()),
            autosave_secs: 0,
            ..AgentConfig::default()
        }
    }

    #[tokio::test]
    async fn builds_connected_agent_with_default_actions() {
        let dir = TempDir::new().unwrap();
        let setup = AgentBuilder::new(config(&dir)).build().await.unwrap();

        assert_eq!(setup.session_id, "test");
        assert!(setup.runtime.executor().has_action("chat"));
        assert!(setup.runtime.executor().has_action("go_to_waypoint"));

        let result = setup.runtime.execute("chat", json!({"message": "hi"})).await;
        assert!(result.success, "{}", result.message);
        setup.runtime.shutdown();
    }

    #[tokio::test]
    async fn telemetry_follows_runtime_events() {
        let dir = TempDir::new().unwrap();
        let setup = AgentBuilder::new(config(&dir)).build().await.unwrap();

        setup.runtime.events().emit(WorldEvent::Health {
            health: 5.0,
            food: 3,
        });

        let snapshot = setup.world.snapshot();
        assert_eq!(snapshot.health, 5.0);
        assert_eq!(snapshot.food, 3);
        setup.runtime.shutdown();
    }

    #[tokio::test]
    async fn waypoints_survive_restart() {
        let dir = TempDir::new().unwrap();

        let first = AgentBuilder::new(config(&dir)).build().await.unwrap();
        let result = first
            .runtime
            .execute("set_waypoint", json!({"name": "spawn"}))
            .await;
        assert!(result.success, "{}", result.message);
        first.runtime.shutdown();

        let second = AgentBuilder::new(config(&dir)).build().await.unwrap();
        let result = second.runtime.execute("list_waypoints", json!({})).await;
        assert!(result.message.contains("spawn"));
        second.runtime.shutdown();
    }
}
