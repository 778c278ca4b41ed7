//! Loosely-typed invocation parameters.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON parameters handed to [`crate::Action::execute`].
///
/// The framework never inspects these. Actions read them directly or decode
/// them into a typed struct (see [`crate::TypedAction`]).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionParams(Value);

impl ActionParams {
    /// An empty JSON object.
    pub fn empty() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Decodes into `T`. `null` is treated as an empty object so parameterless
    /// actions can be called without any JSON at all.
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        match &self.0 {
            Value::Null => serde_json::from_value(Value::Object(serde_json::Map::new())),
            value => serde_json::from_value(value.clone()),
        }
    }
}

impl From<Value> for ActionParams {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
