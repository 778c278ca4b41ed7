//! Runtime facade.
//!
//! Performs the two-phase build (base context, then executor, then the
//! executor back-patched into the context), forwards world events onto the
//! bus, and owns the background tasks until [`Runtime::shutdown`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{Action, ActionParams, ActionResult, Result};
use crate::context::{ActionContext, ContextManager, ContextParams};
use crate::events::{EventBus, WorldEvent};
use crate::executor::ActionExecutor;
use crate::prompt::ActionPromptGenerator;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Per-topic broadcast capacity of the event bus.
    pub event_capacity: usize,
    /// Capacity of the world event channel created when no receiver is supplied.
    pub world_event_capacity: usize,
    /// How often the location registry is saved. `None` disables autosave.
    pub autosave_interval: Option<Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_capacity: 100,
            world_event_capacity: 256,
            autosave_interval: Some(Duration::from_secs(60)),
        }
    }
}

/// Assembled action runtime.
pub struct Runtime {
    contexts: Arc<ContextManager>,
    executor: Arc<ActionExecutor>,
    prompts: ActionPromptGenerator,
    world_tx: Option<mpsc::Sender<WorldEvent>>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn executor(&self) -> &Arc<ActionExecutor> {
        &self.executor
    }

    pub fn prompts(&self) -> &ActionPromptGenerator {
        &self.prompts
    }

    pub fn context_manager(&self) -> &Arc<ContextManager> {
        &self.contexts
    }

    pub fn events(&self) -> &EventBus {
        self.executor.events()
    }

    /// The base context, for prompt filtering and direct collaborator access.
    pub fn context(&self) -> Result<ActionContext> {
        Ok(self.contexts.context()?)
    }

    /// Sender feeding the world event bridge.
    ///
    /// `None` when the builder was given its own receiver.
    pub fn world_sender(&self) -> Option<mpsc::Sender<WorldEvent>> {
        self.world_tx.clone()
    }

    /// Shorthand for [`ActionExecutor::execute`].
    pub async fn execute(&self, id: &str, params: impl Into<ActionParams>) -> ActionResult {
        self.executor.execute(id, params).await
    }

    /// Stops background tasks and tears down the base context.
    ///
    /// In-flight actions observe the process-wide interrupt at their next
    /// poll point.
    pub fn shutdown(self) {
        drop(self.world_tx);
        self.contexts.cleanup();
        info!(target: "runtime", "Runtime shut down");
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    params: ContextParams,
    actions: Vec<Arc<dyn Action>>,
    world_rx: Option<mpsc::Receiver<WorldEvent>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            params: ContextParams::new(),
            actions: Vec::new(),
            world_rx: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// World collaborators and config bag for the base context.
    pub fn context(mut self, params: ContextParams) -> Self {
        self.params = params;
        self
    }

    pub fn action(mut self, action: Arc<dyn Action>) -> Self {
        self.actions.push(action);
        self
    }

    pub fn actions(mut self, actions: impl IntoIterator<Item = Arc<dyn Action>>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Use an existing world event receiver instead of creating a channel.
    pub fn world_events(mut self, rx: mpsc::Receiver<WorldEvent>) -> Self {
        self.world_rx = Some(rx);
        self
    }

    /// Build the runtime. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails if a required world collaborator is missing from the context
    /// parameters.
    pub async fn build(self) -> Result<Runtime> {
        let Self {
            config,
            params,
            actions,
            world_rx,
        } = self;

        // Phase one: the base context starts on a placeholder bus unless
        // the caller supplied one.
        let events = params
            .events
            .clone()
            .unwrap_or_else(|| EventBus::with_capacity(config.event_capacity));
        let contexts = Arc::new(ContextManager::new());
        let base = contexts.create_context(params)?;

        // Phase two: the executor, then the back-patch.
        let executor = Arc::new(ActionExecutor::new(Arc::clone(&contexts), events.clone()));
        contexts.update_executor(&executor)?;
        executor.register_all(actions);

        let (world_tx, world_rx) = match world_rx {
            Some(rx) => (None, rx),
            None => {
                let (tx, rx) = mpsc::channel(config.world_event_capacity.max(1));
                (Some(tx), rx)
            }
        };
        contexts.track_background("world-event-bridge", events.bridge(world_rx));

        if let Some(interval) = config.autosave_interval {
            let locations = Arc::clone(&base.locations);
            contexts.spawn_background("location-autosave", async move {
                let mut ticker = tokio::time::interval(interval);
                // The first tick completes immediately.
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    match locations.save() {
                        Ok(()) => debug!(target: "runtime", "Locations autosaved"),
                        Err(e) => warn!(target: "runtime", error = %e, "Location autosave failed"),
                    }
                }
            });
        }

        info!(
            target: "runtime",
            actions = executor.registered_actions().len(),
            autosave = config.autosave_interval.is_some(),
            "Runtime ready"
        );

        Ok(Runtime {
            prompts: ActionPromptGenerator::new(Arc::clone(&executor)),
            contexts,
            executor,
            world_tx,
        })
    }
}
