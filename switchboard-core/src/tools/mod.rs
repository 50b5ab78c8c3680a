//! Tool system for agent capabilities
//!
//! This module tracks which tools exist and which agents may use them.
//! Key features:
//! - Closed vocabularies for capability tiers and tool categories
//! - Duplicate detection and metadata validation at registration
//! - Per-agent filtering by active flag, capability tier and category
//! - A bounded execution log of tool invocations
//!
//! The registry never runs a tool. It hands callables to the agent runtime,
//! which invokes them and reports back through [`ToolRegistry::log_execution`].

mod capability;
mod log;
mod registry;
mod result;
mod tool;

pub use capability::{AgentCapability, CapabilitySet, ToolCategory, UnknownVariant};
pub use log::{DEFAULT_LOG_CAPACITY, DEFAULT_LOG_LIMIT, ExecutionLog, ExecutionLogEntry};
pub use registry::{EntityKind, RegistryError, ToolRegistry};
pub use result::{ToolError, ToolErrorKind};
pub use tool::{
    BoxedCallable, FnCallable, RegisteredTool, RenderComponent, ToolCallable, ToolDescriptor,
    ToolExecutionContext, ToolMetadata,
};
