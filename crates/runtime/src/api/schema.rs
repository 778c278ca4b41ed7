//! Descriptive parameter metadata for prompt generation.
//!
//! A [`ParamsSchema`] documents what an action expects so a language model can
//! call it. It is never used to validate or coerce the parameters of an
//! actual invocation; that stays with each action.

use serde::Serialize;
use strum::{Display, IntoStaticStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
    pub required: bool,
}

/// Ordered list of documented parameters. Empty by default.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParamsSchema {
    params: Vec<ParamSpec>,
}

impl ParamsSchema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn required(mut self, name: &str, kind: ParamKind, description: &str) -> Self {
        self.params.push(ParamSpec {
            name: name.to_string(),
            kind,
            description: description.to_string(),
            required: true,
        });
        self
    }

    #[must_use]
    pub fn optional(mut self, name: &str, kind: ParamKind, description: &str) -> Self {
        self.params.push(ParamSpec {
            name: name.to_string(),
            kind,
            description: description.to_string(),
            required: false,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter()
    }
}
