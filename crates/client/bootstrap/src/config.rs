//! Agent configuration structures and loaders.
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use runtime::{ConfigBag, RuntimeConfig};
use serde_json::Value;

/// Prefix of variables copied into the action config bag.
pub const CONFIG_BAG_PREFIX: &str = "AGENT_CFG_";

/// Configuration required to bootstrap the agent runtime.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    pub username: String,
    pub session_id: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub event_capacity: usize,
    /// Seconds between location autosaves; `0` disables autosave.
    pub autosave_secs: u64,
    pub log_stderr: bool,
    /// Opaque settings handed to actions through their context.
    pub settings: serde_json::Map<String, Value>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            username: "agent".to_string(),
            session_id: None,
            data_dir: None,
            event_capacity: RuntimeConfig::default().event_capacity,
            autosave_secs: 60,
            log_stderr: false,
            settings: serde_json::Map::new(),
        }
    }
}

impl AgentConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `AGENT_USERNAME` - Name reported in telemetry (default: agent)
    /// - `AGENT_SESSION_ID` - Session identifier for saved data (default: auto-generated)
    /// - `AGENT_DATA_DIR` - Directory for saved data (default: platform-specific)
    /// - `AGENT_EVENT_CAPACITY` - Event bus channel capacity per topic (default: 100)
    /// - `AGENT_AUTOSAVE_SECS` - Waypoint autosave interval, 0 disables (default: 60)
    /// - `AGENT_LOG_STDERR` - Also log to stderr (default: false)
    /// - `AGENT_CFG_<KEY>` - Action setting; `__` in the key becomes `.`
    ///   and the value is parsed as JSON when possible
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    /// Same as [`from_env`](Self::from_env) over an explicit variable set.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        let mut config = Self::default();

        if let Some(username) = vars.get("AGENT_USERNAME").filter(|v| !v.is_empty()) {
            config.username = username.clone();
        }

        // Session ID (optional)
        config.session_id = vars.get("AGENT_SESSION_ID").cloned();

        // Save data directory (optional)
        config.data_dir = vars.get("AGENT_DATA_DIR").map(PathBuf::from);

        if let Some(capacity) = read_var::<usize>(&vars, "AGENT_EVENT_CAPACITY") {
            config.event_capacity = capacity.max(1);
        }

        if let Some(secs) = read_var::<u64>(&vars, "AGENT_AUTOSAVE_SECS") {
            config.autosave_secs = secs;
        }

        if let Some(enable) = read_var::<bool>(&vars, "AGENT_LOG_STDERR") {
            config.log_stderr = enable;
        } else if vars.contains_key("AGENT_LOG_STDERR") {
            // Also accept just setting the variable without value as "true"
            config.log_stderr = true;
        }

        for (key, raw) in &vars {
            let Some(name) = key.strip_prefix(CONFIG_BAG_PREFIX) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            let name = name.to_ascii_lowercase().replace("__", ".");
            let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()));
            config.settings.insert(name, value);
        }

        config
    }

    /// Session identifier, generated from the current time when unset.
    pub fn resolved_session_id(&self) -> String {
        self.session_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("session_{}", chrono::Utc::now().timestamp()))
    }

    /// Configured data directory or the platform default.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            event_capacity: self.event_capacity,
            autosave_interval: (self.autosave_secs > 0)
                .then(|| Duration::from_secs(self.autosave_secs)),
            ..RuntimeConfig::default()
        }
    }

    pub fn config_bag(&self) -> ConfigBag {
        ConfigBag::new(self.settings.clone())
    }
}

/// Platform data directory, e.g. `~/.local/share/agent` on Linux.
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "agent")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./agent_data"))
}

/// Platform log directory, e.g. `~/.cache/agent/logs` on Linux.
pub fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "agent")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/agent"))
        .join("logs")
}

fn read_var<T>(vars: &HashMap<String, String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    vars.get(key)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_without_variables() {
        let config = AgentConfig::from_vars(Vec::new());
        assert_eq!(config.username, "agent");
        assert_eq!(config.event_capacity, 100);
        assert!(config.settings.is_empty());
        assert!(!config.log_stderr);
        assert!(config.runtime_config().autosave_interval.is_some());
    }

    #[test]
    fn reads_known_variables() {
        let config = AgentConfig::from_vars(vars(&[
            ("AGENT_USERNAME", "builder"),
            ("AGENT_SESSION_ID", "s1"),
            ("AGENT_DATA_DIR", "/var/agent"),
            ("AGENT_EVENT_CAPACITY", "0"),
            ("AGENT_AUTOSAVE_SECS", "0"),
            ("AGENT_LOG_STDERR", ""),
        ]));

        assert_eq!(config.username, "builder");
        assert_eq!(config.resolved_session_id(), "s1");
        assert_eq!(config.resolved_data_dir(), PathBuf::from("/var/agent"));
        assert_eq!(config.event_capacity, 1);
        assert!(config.runtime_config().autosave_interval.is_none());
        assert!(config.log_stderr);
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = AgentConfig::from_vars(vars(&[("AGENT_EVENT_CAPACITY", "lots")]));
        assert_eq!(config.event_capacity, 100);
    }

    #[test]
    fn prefixed_variables_fill_the_config_bag() {
        let config = AgentConfig::from_vars(vars(&[
            ("AGENT_CFG_WAIT__MAX_SECONDS", "30"),
            ("AGENT_CFG_GREETING", "hello there"),
            ("AGENT_CFG_", "ignored"),
            ("PATH", "/usr/bin"),
        ]));

        let bag = config.config_bag();
        assert_eq!(bag.len(), 2);
        assert_eq!(bag.get::<f64>("wait.max_seconds"), Some(30.0));
        assert_eq!(bag.raw("greeting"), Some(&json!("hello there")));
    }

    #[test]
    fn generated_session_ids_are_prefixed() {
        let config = AgentConfig::default();
        assert!(config.resolved_session_id().starts_with("session_"));
    }
}
