//! Bootstrap utilities for the agent binary.
//!
//! Provides configuration loading, logging setup, an offline simulated
//! world, and the builder that wires them into a [`runtime::Runtime`].
pub mod builder;
pub mod config;
pub mod logging;
pub mod world;

pub use builder::{AgentBuilder, AgentSetup};
pub use config::{AgentConfig, default_data_dir, default_log_dir};
pub use logging::{LoggingGuard, setup_logging};
pub use world::SimulatedWorld;
