//! Base context ownership and per-action derivation.

use std::future::Future;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{ActionContext, ActionLogger, ContextParams};
use crate::api::ContextError;
use crate::events::EventBus;
use crate::executor::ActionExecutor;
use crate::interrupt::InterruptSignal;
use crate::repository::{InMemoryLocationRegistry, InMemorySpatialCache};

/// Owns the single base context and derives per-action contexts from it.
///
/// # Lifecycle
///
/// 1. [`create_context`](Self::create_context) builds the base context once.
/// 2. [`ActionExecutor::new`] is constructed with this manager.
/// 3. [`update_executor`](Self::update_executor) installs the executor
///    reference into the base context (the construction cycle back-patch).
/// 4. [`create_action_context`](Self::create_action_context) runs once per
///    `execute()`.
/// 5. [`cleanup`](Self::cleanup) tears everything down so step 1 can run
///    again, e.g. after a reconnect.
#[derive(Default)]
pub struct ContextManager {
    base: RwLock<Option<ActionContext>>,
    background: Mutex<Vec<(&'static str, JoinHandle<()>)>>,
}

impl ContextManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the base context.
    ///
    /// # Errors
    ///
    /// - [`ContextError::AlreadyCreated`] if a base context already exists
    /// - [`ContextError::MissingCollaborator`] if a required world handle is absent
    pub fn create_context(&self, params: ContextParams) -> Result<ActionContext, ContextError> {
        let mut base = self.base.write().map_err(|_| ContextError::LockPoisoned)?;
        if base.is_some() {
            return Err(ContextError::AlreadyCreated);
        }

        let telemetry = params
            .telemetry
            .ok_or(ContextError::MissingCollaborator("telemetry"))?;
        let chat = params
            .chat
            .ok_or(ContextError::MissingCollaborator("chat"))?;
        let navigator = params
            .navigator
            .ok_or(ContextError::MissingCollaborator("navigator"))?;
        let placer = params
            .placer
            .ok_or(ContextError::MissingCollaborator("placer"))?;

        let global_interrupt = InterruptSignal::new();
        let context = ActionContext {
            telemetry,
            chat,
            blocks: params
                .blocks
                .unwrap_or_else(|| Arc::new(InMemorySpatialCache::new())),
            containers: params
                .containers
                .unwrap_or_else(|| Arc::new(InMemorySpatialCache::new())),
            locations: params
                .locations
                .unwrap_or_else(|| Arc::new(InMemoryLocationRegistry::new())),
            navigator,
            placer,
            events: params.events.unwrap_or_default(),
            config: params.config,
            logger: ActionLogger::root(),
            interrupt: global_interrupt.clone(),
            global_interrupt,
            executor: Arc::new(OnceLock::new()),
        };

        *base = Some(context.clone());
        info!(
            target: "runtime::context",
            config_keys = context.config.len(),
            "Base context created"
        );

        Ok(context)
    }

    /// Returns the base context.
    ///
    /// # Errors
    ///
    /// [`ContextError::NotCreated`] before [`create_context`](Self::create_context).
    pub fn context(&self) -> Result<ActionContext, ContextError> {
        self.base
            .read()
            .map_err(|_| ContextError::LockPoisoned)?
            .clone()
            .ok_or(ContextError::NotCreated)
    }

    pub fn is_created(&self) -> bool {
        self.base
            .read()
            .map(|base| base.is_some())
            .unwrap_or(false)
    }

    /// Derives a per-action context: shared collaborators, a logger prefixed
    /// with `name`, and a brand-new interrupt signal.
    pub fn create_action_context(&self, name: &str) -> Result<ActionContext, ContextError> {
        let base = self.base.read().map_err(|_| ContextError::LockPoisoned)?;
        let base = base.as_ref().ok_or(ContextError::NotCreated)?;
        Ok(base.derive(name))
    }

    /// Installs the executor into the base context. Allowed once per base
    /// context.
    ///
    /// If the base context was built with a different event bus than the
    /// executor's, the base context switches to the executor's bus so
    /// lifecycle events and world events share one dispatcher.
    pub fn update_executor(&self, executor: &Arc<ActionExecutor>) -> Result<(), ContextError> {
        let mut base = self.base.write().map_err(|_| ContextError::LockPoisoned)?;
        let base = base.as_mut().ok_or(ContextError::NotCreated)?;

        base.executor
            .set(Arc::downgrade(executor))
            .map_err(|_| ContextError::ExecutorAlreadyInstalled)?;

        if !base.events.same_bus(executor.events()) {
            debug!(
                target: "runtime::context",
                "Replacing placeholder event bus with the executor's bus"
            );
            base.events = EventBus::clone(executor.events());
        }

        debug!(target: "runtime::context", "Executor installed on base context");
        Ok(())
    }

    /// Spawns a task owned by this manager; it is aborted by [`cleanup`](Self::cleanup).
    pub fn spawn_background<F>(&self, name: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.track_background(name, tokio::spawn(task));
    }

    /// Takes ownership of an already spawned task.
    pub fn track_background(&self, name: &'static str, handle: JoinHandle<()>) {
        debug!(target: "runtime::context", task = name, "Tracking background task");
        self.background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((name, handle));
    }

    pub fn background_tasks(&self) -> usize {
        self.background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, handle)| !handle.is_finished())
            .count()
    }

    /// Tears down the base context.
    ///
    /// Aborts background tasks, trips the process-wide interrupt so
    /// in-flight actions stop at their next poll point, stops navigation,
    /// flushes the caches, saves the location registry, and forgets the
    /// base context. Collaborator failures are logged, not returned.
    pub fn cleanup(&self) {
        let tasks = std::mem::take(
            &mut *self
                .background
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for (name, handle) in tasks {
            handle.abort();
            debug!(target: "runtime::context", task = name, "Background task aborted");
        }

        let base = self
            .base
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(context) = base else {
            debug!(target: "runtime::context", "Cleanup requested with no base context");
            return;
        };

        context.global_interrupt.interrupt("context cleanup");
        context.navigator.stop();

        if let Err(e) = context.blocks.flush() {
            warn!(target: "runtime::context", error = %e, "Failed to flush block cache");
        }
        if let Err(e) = context.containers.flush() {
            warn!(target: "runtime::context", error = %e, "Failed to flush container cache");
        }
        if let Err(e) = context.locations.save() {
            warn!(target: "runtime::context", error = %e, "Failed to save locations");
        }

        info!(target: "runtime::context", "Base context cleaned up");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubWorld, stub_params, stub_params_with};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    #[test]
    fn context_before_create_fails() {
        let manager = ContextManager::new();
        assert!(matches!(manager.context(), Err(ContextError::NotCreated)));
        assert!(matches!(
            manager.create_action_context("Chat"),
            Err(ContextError::NotCreated)
        ));
    }

    #[test]
    fn create_twice_fails() {
        let manager = ContextManager::new();
        manager.create_context(stub_params()).unwrap();

        assert!(manager.is_created());
        assert!(matches!(
            manager.create_context(stub_params()),
            Err(ContextError::AlreadyCreated)
        ));
    }

    #[test]
    fn missing_collaborator_is_reported() {
        let manager = ContextManager::new();
        let err = manager.create_context(ContextParams::new()).unwrap_err();
        assert!(matches!(err, ContextError::MissingCollaborator("telemetry")));
        assert!(!manager.is_created());
    }

    #[test]
    fn action_contexts_get_fresh_signals_and_share_collaborators() {
        let manager = ContextManager::new();
        let base = manager.create_context(stub_params()).unwrap();

        let a = manager.create_action_context("Chat").unwrap();
        let b = manager.create_action_context("Chat").unwrap();

        assert!(!a.interrupt.same_signal(&b.interrupt));
        assert!(!a.interrupt.same_signal(&base.interrupt));
        assert!(a.global_interrupt.same_signal(&base.global_interrupt));
        assert!(Arc::ptr_eq(&a.locations, &base.locations));
        assert!(a.events.same_bus(&base.events));
        assert_eq!(a.logger.prefix(), Some("Chat"));
        assert_eq!(base.logger.prefix(), None);

        a.interrupt.interrupt("stop a");
        assert!(a.check_interrupted().is_err());
        assert!(b.check_interrupted().is_ok());
    }

    #[test]
    fn global_interrupt_reaches_every_action_context() {
        let manager = ContextManager::new();
        let base = manager.create_context(stub_params()).unwrap();
        let ctx = manager.create_action_context("Wait").unwrap();

        base.global_interrupt.interrupt("everyone stop");

        let err = ctx.check_interrupted().unwrap_err();
        assert_eq!(err.reason, "everyone stop");
        assert!(!ctx.interrupt.is_interrupted());
    }

    #[test]
    fn update_executor_installs_once_and_swaps_placeholder_bus() {
        let manager = Arc::new(ContextManager::new());
        let placeholder = EventBus::new();
        manager
            .create_context(stub_params().events(placeholder.clone()))
            .unwrap();

        let real_bus = EventBus::new();
        let executor = Arc::new(ActionExecutor::new(Arc::clone(&manager), real_bus.clone()));

        manager.update_executor(&executor).unwrap();
        let base = manager.context().unwrap();
        assert!(base.events.same_bus(&real_bus));
        assert!(!base.events.same_bus(&placeholder));
        assert!(base.executor().is_some());

        let derived = manager.create_action_context("Chat").unwrap();
        assert!(derived.executor().is_some());

        assert!(matches!(
            manager.update_executor(&executor),
            Err(ContextError::ExecutorAlreadyInstalled)
        ));
    }

    #[tokio::test]
    async fn cleanup_resets_and_aborts_background_tasks() {
        let world = Arc::new(StubWorld::default());
        let manager = ContextManager::new();
        let base = manager
            .create_context(stub_params_with(Arc::clone(&world)))
            .unwrap();
        manager.spawn_background("forever", async {
            loop {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
        });
        assert_eq!(manager.background_tasks(), 1);

        manager.cleanup();

        assert!(!manager.is_created());
        assert!(base.global_interrupt.is_interrupted());
        assert_eq!(manager.background_tasks(), 0);
        assert_eq!(world.stops.load(Ordering::SeqCst), 1);

        // A new base context can be built after cleanup.
        manager.create_context(stub_params()).unwrap();
    }
}
