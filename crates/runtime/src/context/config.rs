//! Opaque configuration bag passed through to actions.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Read-only key/value configuration.
///
/// The runtime never interprets it; actions read whatever keys they care
/// about.
#[derive(Clone, Debug, Default)]
pub struct ConfigBag {
    values: Arc<Map<String, Value>>,
}

impl ConfigBag {
    pub fn new(values: Map<String, Value>) -> Self {
        Self {
            values: Arc::new(values),
        }
    }

    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Decodes `key` into `T`; `None` when absent or of the wrong shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.raw(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ConfigBag {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_lookup_with_fallback() {
        let config: ConfigBag = [
            ("wait.max_seconds", json!(30)),
            ("chat.prefix", json!("[bot]")),
        ]
        .into_iter()
        .collect();

        assert_eq!(config.get::<u64>("wait.max_seconds"), Some(30));
        assert_eq!(config.get::<String>("chat.prefix").as_deref(), Some("[bot]"));
        assert_eq!(config.get::<u64>("chat.prefix"), None);
        assert_eq!(config.get_or("missing", 7u32), 7);
        assert_eq!(config.len(), 2);
    }
}
