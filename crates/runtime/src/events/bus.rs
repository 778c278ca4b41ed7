//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use strum::IntoEnumIterator;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use super::types::{Event, Topic, WorldEvent};

/// What a listener returns. `Err` is logged and otherwise ignored.
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

type SyncHandler = Arc<dyn Fn(&Event) -> HandlerResult + Send + Sync>;
type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;
type AsyncHandler = Arc<dyn Fn(Event) -> HandlerFuture + Send + Sync>;

enum Callback {
    Sync(SyncHandler),
    Async(AsyncHandler),
}

struct Listener {
    id: u64,
    once: bool,
    fired: AtomicBool,
    callback: Callback,
}

struct Inner {
    listeners: RwLock<HashMap<Topic, Vec<Arc<Listener>>>>,
    channels: HashMap<Topic, broadcast::Sender<Event>>,
    next_id: AtomicU64,
}

/// Publish/subscribe dispatcher.
///
/// Two ways to listen:
/// - [`on`](EventBus::on) / [`once`](EventBus::once) /
///   [`on_async`](EventBus::on_async) register callbacks that
///   [`emit`](EventBus::emit) invokes synchronously, in registration order.
///   A callback that fails or panics is logged and skipped; it never reaches
///   other listeners or the emitter.
/// - [`subscribe`](EventBus::subscribe) hands out a broadcast receiver for
///   consumers that prefer to pull events from their own task.
///
/// Clones share the same listeners and channels.
pub struct EventBus {
    inner: Arc<Inner>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified channel capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Topic::iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            inner: Arc::new(Inner {
                listeners: RwLock::new(HashMap::new()),
                channels,
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Registers a listener invoked on every emit of `topic`.
    pub fn on<F>(&self, topic: Topic, handler: F) -> ListenerHandle
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.add_listener(topic, false, Callback::Sync(Arc::new(handler)))
    }

    /// Registers a listener invoked on the next emit of `topic` only.
    pub fn once<F>(&self, topic: Topic, handler: F) -> ListenerHandle
    where
        F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.add_listener(topic, true, Callback::Sync(Arc::new(handler)))
    }

    /// Registers an async listener. Each emit spawns the returned future on
    /// the current tokio runtime; a failure is logged when it resolves.
    pub fn on_async<F, Fut>(&self, topic: Topic, handler: F) -> ListenerHandle
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let callback: AsyncHandler =
            Arc::new(move |event| -> HandlerFuture { Box::pin(handler(event)) });
        self.add_listener(topic, false, Callback::Async(callback))
    }

    fn add_listener(&self, topic: Topic, once: bool, callback: Callback) -> ListenerHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let listener = Arc::new(Listener {
            id,
            once,
            fired: AtomicBool::new(false),
            callback,
        });

        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(topic)
            .or_default()
            .push(listener);

        ListenerHandle {
            topic,
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Delivers `event` to every current listener of its topic, then to
    /// broadcast subscribers.
    ///
    /// Returns the number of callbacks invoked.
    pub fn emit(&self, event: impl Into<Event>) -> usize {
        let event = event.into();
        let topic = event.topic();

        // Snapshot so listeners may (un)subscribe while we iterate.
        let snapshot: Vec<Arc<Listener>> = self
            .inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&topic)
            .cloned()
            .unwrap_or_default();

        let mut invoked = 0;
        let mut spent = Vec::new();

        for listener in &snapshot {
            if listener.once {
                if listener.fired.swap(true, Ordering::AcqRel) {
                    continue;
                }
                spent.push(listener.id);
            }
            invoked += 1;

            match &listener.callback {
                Callback::Sync(handler) => invoke_sync(topic, listener.id, handler, &event),
                Callback::Async(handler) => invoke_async(topic, listener.id, handler, &event),
            }
        }

        if !spent.is_empty() {
            self.remove_listeners(topic, &spent);
        }

        if let Some(tx) = self.inner.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic - this is normal, not an error
            trace!(target: "runtime::events", "No subscribers for topic {}", topic);
        }

        invoked
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.inner.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // Every topic is created up front; this arm only exists for totality.
            None => broadcast::channel(1).1,
        }
    }

    /// Forwards world events from the session into this bus until the sender
    /// side closes. Must be called from within a tokio runtime.
    pub fn bridge(&self, mut world_rx: mpsc::Receiver<WorldEvent>) -> JoinHandle<()> {
        let bus = self.clone();
        tokio::spawn(async move {
            while let Some(event) = world_rx.recv().await {
                bus.emit(event);
            }
            debug!(target: "runtime::events", "world event source closed");
        })
    }

    /// Number of callbacks currently registered for `topic`.
    pub fn listener_count(&self, topic: Topic) -> usize {
        self.inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&topic)
            .map_or(0, Vec::len)
    }

    /// True if both handles share listeners and channels.
    pub fn same_bus(&self, other: &EventBus) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn remove_listeners(&self, topic: Topic, ids: &[u64]) {
        remove_from(&self.inner, topic, ids);
    }
}

fn remove_from(inner: &Inner, topic: Topic, ids: &[u64]) -> bool {
    let mut listeners = inner
        .listeners
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    let Some(list) = listeners.get_mut(&topic) else {
        return false;
    };
    let before = list.len();
    list.retain(|listener| !ids.contains(&listener.id));
    before != list.len()
}

fn invoke_sync(topic: Topic, id: u64, handler: &SyncHandler, event: &Event) {
    match catch_unwind(AssertUnwindSafe(|| handler(event))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(
            target: "runtime::events",
            topic = %topic,
            listener = id,
            error = %e,
            "Event listener failed"
        ),
        Err(payload) => error!(
            target: "runtime::events",
            topic = %topic,
            listener = id,
            panic = panic_message(payload.as_ref()),
            "Event listener panicked"
        ),
    }
}

fn invoke_async(topic: Topic, id: u64, handler: &AsyncHandler, event: &Event) {
    let runtime = match tokio::runtime::Handle::try_current() {
        Ok(runtime) => runtime,
        Err(_) => {
            warn!(
                target: "runtime::events",
                topic = %topic,
                listener = id,
                "Async listener skipped: no tokio runtime"
            );
            return;
        }
    };

    let future = match catch_unwind(AssertUnwindSafe(|| handler(event.clone()))) {
        Ok(future) => future,
        Err(payload) => {
            error!(
                target: "runtime::events",
                topic = %topic,
                listener = id,
                panic = panic_message(payload.as_ref()),
                "Async listener panicked"
            );
            return;
        }
    };

    runtime.spawn(async move {
        if let Err(e) = future.await {
            error!(
                target: "runtime::events",
                topic = %topic,
                listener = id,
                error = %e,
                "Async event listener failed"
            );
        }
    });
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").finish_non_exhaustive()
    }
}

/// Disposer returned by [`EventBus::on`] and friends.
///
/// Dropping the handle does not unsubscribe; call [`remove`](Self::remove).
#[derive(Debug, Clone)]
pub struct ListenerHandle {
    topic: Topic,
    id: u64,
    bus: Weak<Inner>,
}

impl ListenerHandle {
    /// Unregisters the listener. Returns `false` if it was already gone.
    pub fn remove(&self) -> bool {
        match self.bus.upgrade() {
            Some(inner) => remove_from(&inner, self.topic, &[self.id]),
            None => false,
        }
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn chat(message: &str) -> WorldEvent {
        WorldEvent::Chat {
            username: "alex".into(),
            message: message.into(),
        }
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            bus.on(Topic::Chat, move |_| {
                seen.lock().unwrap().push(label);
                Ok(())
            });
        }

        assert_eq!(bus.emit(chat("hello")), 3);
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn once_fires_exactly_one_time() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        {
            let count = Arc::clone(&count);
            bus.once(Topic::Chat, move |_| {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        bus.emit(chat("one"));
        bus.emit(chat("two"));
        bus.emit(chat("three"));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.listener_count(Topic::Chat), 0);
    }

    #[test]
    fn failing_and_panicking_listeners_do_not_stop_others() {
        let bus = EventBus::new();
        let reached = Arc::new(AtomicUsize::new(0));

        bus.on(Topic::Chat, |_| Err("listener broke".into()));
        bus.on(Topic::Chat, |_| panic!("listener exploded"));
        {
            let reached = Arc::clone(&reached);
            bus.on(Topic::Chat, move |_| {
                reached.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        // Does not panic here either.
        assert_eq!(bus.emit(chat("hi")), 3);
        assert_eq!(reached.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_unsubscribes() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let handle = {
            let count = Arc::clone(&count);
            bus.on(Topic::Death, move |_| {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        };

        bus.emit(WorldEvent::Death);
        assert!(handle.remove());
        assert!(!handle.remove());
        bus.emit(WorldEvent::Death);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn topics_are_isolated() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        {
            let count = Arc::clone(&count);
            bus.on(Topic::Health, move |_| {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        assert_eq!(bus.emit(chat("not health")), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn clones_share_listeners() {
        let bus = EventBus::new();
        let other = bus.clone();
        bus.on(Topic::Chat, |_| Ok(()));

        assert!(bus.same_bus(&other));
        assert_eq!(other.listener_count(Topic::Chat), 1);
        assert!(!bus.same_bus(&EventBus::new()));
    }

    #[tokio::test]
    async fn broadcast_subscribers_receive_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Topic::Chat);

        bus.emit(chat("over the wire"));

        match rx.recv().await.unwrap() {
            Event::World(WorldEvent::Chat { message, .. }) => assert_eq!(message, "over the wire"),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn async_listener_failures_are_contained() {
        let bus = EventBus::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        bus.on_async(Topic::Chat, |_| async {
            HandlerResult::Err("async listener broke".into())
        });
        bus.on_async(Topic::Chat, move |event| {
            let tx = tx.clone();
            async move {
                tx.send(event.topic()).map_err(|e| e.to_string())?;
                HandlerResult::Ok(())
            }
        });

        assert_eq!(bus.emit(chat("async")), 2);
        let topic = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(topic, Topic::Chat);
    }

    #[tokio::test]
    async fn bridge_forwards_world_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Topic::Health);
        let (world_tx, world_rx) = mpsc::channel(8);

        let bridge = bus.bridge(world_rx);
        world_tx
            .send(WorldEvent::Health {
                health: 12.0,
                food: 18,
            })
            .await
            .unwrap();

        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.topic(), Topic::Health);

        drop(world_tx);
        bridge.await.unwrap();
    }
}
