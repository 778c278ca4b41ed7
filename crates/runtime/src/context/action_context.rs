//! Execution context provided to actions.

use std::sync::{Arc, OnceLock, Weak};

use world_core::{
    BlockInfo, BlockPlacer, ChatChannel, ContainerInfo, LocationRegistry, Navigator, SpatialCache,
    TelemetrySource,
};

use super::{ActionLogger, ConfigBag};
use crate::events::EventBus;
use crate::executor::ActionExecutor;
use crate::interrupt::{InterruptSignal, Interrupted};

/// Late-bound executor reference shared by the base context and everything
/// derived from it. Filled once by [`super::ContextManager::update_executor`].
pub(crate) type ExecutorSlot = Arc<OnceLock<Weak<ActionExecutor>>>;

/// Everything an action can reach while it runs.
///
/// The collaborator handles are shared by reference between the base context
/// and every per-action context; cloning is cheap. Only `logger` and
/// `interrupt` differ between invocations.
#[derive(Clone)]
pub struct ActionContext {
    pub telemetry: Arc<dyn TelemetrySource>,
    pub chat: Arc<dyn ChatChannel>,
    pub blocks: Arc<dyn SpatialCache<BlockInfo>>,
    pub containers: Arc<dyn SpatialCache<ContainerInfo>>,
    pub locations: Arc<dyn LocationRegistry>,
    pub navigator: Arc<dyn Navigator>,
    pub placer: Arc<dyn BlockPlacer>,
    pub events: EventBus,
    pub config: ConfigBag,
    pub logger: ActionLogger,
    /// This invocation's own signal. On the base context it is the
    /// process-wide signal.
    pub interrupt: InterruptSignal,
    /// Process-wide signal tripped by `ActionExecutor::interrupt_all`.
    pub global_interrupt: InterruptSignal,
    pub(crate) executor: ExecutorSlot,
}

impl ActionContext {
    /// Poll point checking both the invocation's signal and the process-wide one.
    pub fn check_interrupted(&self) -> Result<(), Interrupted> {
        self.interrupt.check()?;
        self.global_interrupt.check()
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupt.is_interrupted() || self.global_interrupt.is_interrupted()
    }

    /// Resolves once either signal is interrupted.
    pub async fn interrupted(&self) {
        tokio::select! {
            _ = self.interrupt.cancelled() => {}
            _ = self.global_interrupt.cancelled() => {}
        }
    }

    /// The executor this context belongs to, once installed and still alive.
    ///
    /// Lets composite actions dispatch other actions through the same
    /// lifecycle wrapper.
    pub fn executor(&self) -> Option<Arc<ActionExecutor>> {
        self.executor.get().and_then(Weak::upgrade)
    }

    /// Shallow copy with a fresh signal and a logger prefixed with `name`.
    pub(crate) fn derive(&self, name: &str) -> Self {
        Self {
            logger: ActionLogger::for_action(name),
            interrupt: InterruptSignal::new(),
            ..self.clone()
        }
    }
}

impl std::fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionContext")
            .field("logger", &self.logger)
            .field("interrupt", &self.interrupt)
            .field("global_interrupt", &self.global_interrupt)
            .field("config_keys", &self.config.len())
            .field("executor_installed", &self.executor.get().is_some())
            .finish_non_exhaustive()
    }
}
