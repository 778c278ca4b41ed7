//! Public runtime API surface.
//!
//! This module gathers the types action authors and callers interact with:
//! the [`Action`] contract, its parameters and result values, the descriptive
//! parameter schema, and the error types.

pub mod action;
pub mod errors;
pub mod params;
pub mod result;
pub mod schema;
pub mod typed;

pub use action::Action;
pub use errors::{ActionError, ContextError, Result, RuntimeError};
pub use params::ActionParams;
pub use result::ActionResult;
pub use schema::{ParamKind, ParamSpec, ParamsSchema};
pub use typed::{Typed, TypedAction, typed};
