//! Topic-based event bus for world and lifecycle events.
//!
//! World/session events forwarded from the connection and the executor's
//! synthetic `actionComplete` / `actionError` records travel through the same
//! [`EventBus`] under the same naming scheme, so subscribers treat them
//! uniformly.

mod bus;
mod types;

pub use bus::{EventBus, HandlerResult, ListenerHandle};
pub(crate) use bus::panic_message;
pub use types::{ActionCompleted, ActionFailed, Event, Topic, WorldEvent};
