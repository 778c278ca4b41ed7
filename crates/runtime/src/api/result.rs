//! Uniform outcome of an action invocation.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use super::errors::ActionError;

/// `{success, message, data?, error?}` produced by every invocation.
///
/// Constructed in one step through the helpers below, so a result is always
/// complete by the time anyone sees it.
#[derive(Clone, Debug, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_error"
    )]
    pub error: Option<Arc<ActionError>>,
}

impl ActionResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    /// Failure carrying the error that caused it; the message is the error's display.
    pub fn from_error(error: ActionError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            data: None,
            error: Some(Arc::new(error)),
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

fn serialize_error<S>(error: &Option<Arc<ActionError>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match error {
        Some(error) => serializer.serialize_str(&error.to_string()),
        None => serializer.serialize_none(),
    }
}
