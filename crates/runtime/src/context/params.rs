//! Collaborators used to build the base context.

use std::sync::Arc;

use world_core::{
    BlockInfo, BlockPlacer, ChatChannel, ContainerInfo, LocationRegistry, Navigator, SpatialCache,
    TelemetrySource,
};

use super::ConfigBag;
use crate::events::EventBus;

/// Inputs to [`super::ContextManager::create_context`].
///
/// Telemetry, chat, navigation and placement come from the world session
/// and are required. Caches and the location registry default to in-memory
/// implementations; the event bus defaults to a fresh one.
#[derive(Default)]
pub struct ContextParams {
    pub(crate) telemetry: Option<Arc<dyn TelemetrySource>>,
    pub(crate) chat: Option<Arc<dyn ChatChannel>>,
    pub(crate) navigator: Option<Arc<dyn Navigator>>,
    pub(crate) placer: Option<Arc<dyn BlockPlacer>>,
    pub(crate) blocks: Option<Arc<dyn SpatialCache<BlockInfo>>>,
    pub(crate) containers: Option<Arc<dyn SpatialCache<ContainerInfo>>>,
    pub(crate) locations: Option<Arc<dyn LocationRegistry>>,
    pub(crate) events: Option<EventBus>,
    pub(crate) config: ConfigBag,
}

impl ContextParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn telemetry(mut self, telemetry: Arc<dyn TelemetrySource>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn chat(mut self, chat: Arc<dyn ChatChannel>) -> Self {
        self.chat = Some(chat);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn placer(mut self, placer: Arc<dyn BlockPlacer>) -> Self {
        self.placer = Some(placer);
        self
    }

    pub fn block_cache(mut self, cache: Arc<dyn SpatialCache<BlockInfo>>) -> Self {
        self.blocks = Some(cache);
        self
    }

    pub fn container_cache(mut self, cache: Arc<dyn SpatialCache<ContainerInfo>>) -> Self {
        self.containers = Some(cache);
        self
    }

    pub fn locations(mut self, locations: Arc<dyn LocationRegistry>) -> Self {
        self.locations = Some(locations);
        self
    }

    /// Reuse an existing bus instead of creating one.
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(mut self, config: ConfigBag) -> Self {
        self.config = config;
        self
    }
}
