//! Name-prefixed logging facade over `tracing`.

use std::fmt::Display;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

/// Logger handed to actions through their context.
///
/// Messages go to `tracing` under the `runtime::action` target. A per-action
/// logger prefixes every message with `[name] ` and records the name as the
/// `action` field.
#[derive(Clone, Debug, Default)]
pub struct ActionLogger {
    prefix: Option<Arc<str>>,
}

impl ActionLogger {
    /// Logger without a prefix, used by the base context.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn for_action(name: &str) -> Self {
        Self {
            prefix: Some(Arc::from(name)),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The message as it will be written, prefix included.
    pub fn format(&self, message: impl Display) -> String {
        match &self.prefix {
            Some(name) => format!("[{name}] {message}"),
            None => message.to_string(),
        }
    }

    pub fn debug(&self, message: impl Display) {
        debug!(target: "runtime::action", action = self.prefix(), "{}", self.format(message));
    }

    pub fn info(&self, message: impl Display) {
        info!(target: "runtime::action", action = self.prefix(), "{}", self.format(message));
    }

    pub fn warn(&self, message: impl Display) {
        warn!(target: "runtime::action", action = self.prefix(), "{}", self.format(message));
    }

    pub fn error(&self, message: impl Display) {
        error!(target: "runtime::action", action = self.prefix(), "{}", self.format(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_logger_prefixes_messages() {
        let logger = ActionLogger::for_action("Chat");
        assert_eq!(logger.format("sent"), "[Chat] sent");
        assert_eq!(logger.prefix(), Some("Chat"));
    }

    #[test]
    fn root_logger_leaves_messages_alone() {
        let logger = ActionLogger::root();
        assert_eq!(logger.format(format_args!("{} blocks", 3)), "3 blocks");
        assert_eq!(logger.prefix(), None);
    }
}
