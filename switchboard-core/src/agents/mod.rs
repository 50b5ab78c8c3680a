//! Agents: declared configs, semantic validation and stock presets
//!
//! Agents reach the [`ToolRegistry`](crate::tools::ToolRegistry) through the
//! [`CapabilitiesManager`], which validates a config before the registry
//! stores it.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use switchboard_core::agents::{presets, CapabilitiesManager};
//! use switchboard_core::tools::ToolRegistry;
//!
//! let registry = Arc::new(ToolRegistry::new());
//! let manager = CapabilitiesManager::new(Arc::clone(&registry));
//! manager.register_agent(presets::weather_specialist()).unwrap();
//!
//! assert!(registry.get_agent("weather-specialist").is_some());
//! ```

mod config;
mod manager;
pub mod presets;

pub use config::{AgentConfig, AgentDescriptor, MIN_TIMEOUT_MS};
pub use manager::{AgentConfigError, CapabilitiesManager, validate_agent_config};
