//! Text projections of the action registry for a tool-calling front-end.
//!
//! Everything here is read-only. Filtering by
//! [`Action::should_activate`] only changes what is listed; a hidden action
//! can still be executed directly.

use std::fmt::Write;
use std::sync::Arc;

use crate::api::Action;
use crate::context::ActionContext;
use crate::executor::ActionExecutor;

/// Returned whenever a projection would list nothing.
pub const NO_ACTIONS_AVAILABLE: &str = "No actions available.";

/// Bucket for actions that declare no category. Always listed last.
pub const DEFAULT_CATEGORY: &str = "general";

pub struct ActionPromptGenerator {
    executor: Arc<ActionExecutor>,
}

impl ActionPromptGenerator {
    pub fn new(executor: Arc<ActionExecutor>) -> Self {
        Self { executor }
    }

    /// Lists every registered action in registration order.
    ///
    /// With a context, actions whose `should_activate` returns `false` are
    /// left out.
    pub fn generate_prompt(&self, ctx: Option<&ActionContext>) -> String {
        let actions = self.visible_actions(ctx);
        if actions.is_empty() {
            return NO_ACTIONS_AVAILABLE.to_string();
        }

        let mut out = String::from("Available actions:\n");
        for action in &actions {
            out.push('\n');
            describe(&mut out, action.as_ref());
        }
        out
    }

    /// Projection of a single action, `None` if it is not registered.
    pub fn generate_action_prompt(&self, id: &str) -> Option<String> {
        let action = self.executor.action(id)?;
        let mut out = String::new();
        describe(&mut out, action.as_ref());
        Some(out)
    }

    /// Same as [`generate_prompt`](Self::generate_prompt), grouped under one
    /// heading per category in order of first appearance.
    pub fn generate_categorized_prompt(&self, ctx: Option<&ActionContext>) -> String {
        let actions = self.visible_actions(ctx);
        if actions.is_empty() {
            return NO_ACTIONS_AVAILABLE.to_string();
        }

        let mut groups: Vec<(&str, Vec<&Arc<dyn Action>>)> = Vec::new();
        let mut ungrouped = Vec::new();
        for action in &actions {
            match action.category() {
                Some(category) if category != DEFAULT_CATEGORY => {
                    match groups.iter_mut().find(|(name, _)| *name == category) {
                        Some((_, members)) => members.push(action),
                        None => groups.push((category, vec![action])),
                    }
                }
                _ => ungrouped.push(action),
            }
        }
        if !ungrouped.is_empty() {
            groups.push((DEFAULT_CATEGORY, ungrouped));
        }

        let mut out = String::new();
        for (index, (category, members)) in groups.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "## {category}");
            for action in members {
                out.push('\n');
                describe(&mut out, action.as_ref());
            }
        }
        out
    }

    fn visible_actions(&self, ctx: Option<&ActionContext>) -> Vec<Arc<dyn Action>> {
        let actions = self.executor.registered_actions();
        match ctx {
            Some(ctx) => actions
                .into_iter()
                .filter(|action| action.should_activate(ctx))
                .collect(),
            None => actions,
        }
    }
}

fn describe(out: &mut String, action: &dyn Action) {
    let _ = writeln!(
        out,
        "- {} ({}): {}",
        action.id(),
        action.name(),
        action.description()
    );

    let schema = action.params_schema();
    if schema.is_empty() {
        let _ = writeln!(out, "  Parameters: none");
        return;
    }

    let _ = writeln!(out, "  Parameters:");
    for param in schema.iter() {
        let requirement = if param.required { "required" } else { "optional" };
        let _ = writeln!(
            out,
            "    - {} ({}, {}): {}",
            param.name, param.kind, requirement, param.description
        );
    }
}
