//! # Switchboard - Agent tool access control and capability routing
//!
//! Switchboard gates two kinds of access for agent-driven chat systems:
//! - **Tools**: which callable tools an agent may see, by capability and
//!   tool category, with a bounded execution log
//! - **Providers**: which model/provider serves a request, inferred from
//!   the request text and context, with fallback when the requested
//!   provider falls short
//!
//! ## Quick Start
//!
//! ```rust
//! use switchboard_core::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let switchboard = Switchboard::default();
//!     switchboard.register_agent(presets::weather_specialist())?;
//!
//!     switchboard.registry().register_tool(
//!         ToolMetadata::new("getWeather", "Weather", "Current conditions", ToolCategory::Weather)
//!             .with_capability(AgentCapability::Basic),
//!         FnCallable::boxed(|args, _ctx| Ok(args)),
//!         None,
//!     )?;
//!
//!     let tools = switchboard
//!         .registry()
//!         .get_available_tools_for_agent("weather-specialist")?;
//!     assert_eq!(tools.len(), 1);
//!
//!     let decision = switchboard
//!         .router()
//!         .route_request("openai/gpt-4o", &[RequestCapability::NeedsVision], true);
//!     assert!(!decision.fallback_used);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`tools`]: tool metadata, callables and the [`ToolRegistry`](tools::ToolRegistry)
//! - [`agents`]: agent configs, semantic validation and presets
//! - [`routing`]: request analysis and the [`CapabilityRouter`](routing::CapabilityRouter)
//! - [`config`]: layered configuration via figment

pub mod agents;
pub mod config;
pub mod error;
pub mod routing;
mod switchboard;
pub mod tools;

pub use switchboard::Switchboard;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::Switchboard;
    pub use crate::agents::{
        AgentConfig, AgentConfigError, AgentDescriptor, CapabilitiesManager, presets,
    };
    pub use crate::config::{
        AgentsConfig, ConfigBuilder, RegistryConfig, RouterConfig, SwitchboardConfig,
    };
    pub use crate::error::{Result, SwitchboardError};
    pub use crate::routing::{
        CapabilityRouter, Candidate, ProviderCapability, RequestCapability, RequestContext,
        RoutingDecision, RoutingRules,
    };
    pub use crate::tools::{
        AgentCapability, BoxedCallable, CapabilitySet, ExecutionLogEntry, FnCallable,
        RegisteredTool, RegistryError, ToolCallable, ToolCategory, ToolDescriptor, ToolError,
        ToolErrorKind, ToolExecutionContext, ToolMetadata, ToolRegistry,
    };
}
