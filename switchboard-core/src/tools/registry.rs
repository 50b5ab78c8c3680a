//! Tool Registry for tool registration and agent access control
//!
//! The `ToolRegistry` provides:
//! - Tool registration with duplicate detection and metadata validation
//! - Agent registration with structural checks
//! - Per-agent filtering by active flag, capability tier and category
//! - A bounded execution log for observability
//!
//! All tables sit behind their own lock, so a registry can be shared across
//! threads as `Arc<ToolRegistry>`. Each operation takes its locks
//! independently; a read that follows a registration sees it.
//!
//! # Example
//!
//! ```rust
//! use switchboard_core::agents::AgentConfig;
//! use switchboard_core::tools::{
//!     AgentCapability, FnCallable, ToolCategory, ToolMetadata, ToolRegistry,
//! };
//!
//! let registry = ToolRegistry::new();
//! registry
//!     .register_tool(
//!         ToolMetadata::new("getWeather", "Weather", "Current weather", ToolCategory::Weather)
//!             .with_capability(AgentCapability::Basic),
//!         FnCallable::boxed(|args, _ctx| Ok(args)),
//!         None,
//!     )
//!     .unwrap();
//!
//! registry
//!     .register_agent(AgentConfig::new("forecaster", "Forecaster")
//!         .with_capability(AgentCapability::Basic)
//!         .with_category(ToolCategory::Weather))
//!     .unwrap();
//!
//! let tools = registry.get_available_tools_for_agent("forecaster").unwrap();
//! assert_eq!(tools.len(), 1);
//! ```

use super::log::{ExecutionLog, ExecutionLogEntry};
use super::tool::{
    BoxedCallable, RegisteredTool, RenderComponent, ToolDescriptor, ToolExecutionContext,
    ToolMetadata,
};
use crate::agents::AgentConfig;
use crate::config::RegistryConfig;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Kind of entity a registry error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Tool,
    Agent,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Tool => write!(f, "Tool"),
            EntityKind::Agent => write!(f, "Agent"),
        }
    }
}

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Id collision at registration
    #[error("{kind} with ID '{id}' is already registered")]
    AlreadyExists { kind: EntityKind, id: String },

    /// Unknown id
    #[error("{kind} with ID '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    /// Missing field or value outside a closed enumeration
    #[error("Invalid metadata for '{id}': {field}: {reason}")]
    InvalidMetadata {
        id: String,
        field: String,
        reason: String,
    },
}

impl RegistryError {
    pub(crate) fn tool_exists(id: &str) -> Self {
        RegistryError::AlreadyExists {
            kind: EntityKind::Tool,
            id: id.to_string(),
        }
    }

    pub(crate) fn agent_exists(id: &str) -> Self {
        RegistryError::AlreadyExists {
            kind: EntityKind::Agent,
            id: id.to_string(),
        }
    }

    pub(crate) fn tool_not_found(id: &str) -> Self {
        RegistryError::NotFound {
            kind: EntityKind::Tool,
            id: id.to_string(),
        }
    }

    pub(crate) fn agent_not_found(id: &str) -> Self {
        RegistryError::NotFound {
            kind: EntityKind::Agent,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_metadata(
        id: &str,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidMetadata {
            id: id.to_string(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }
}

/// Registry of tools and the agents allowed to use them
pub struct ToolRegistry {
    tools: RwLock<BTreeMap<String, Arc<RegisteredTool>>>,
    agents: RwLock<BTreeMap<String, AgentConfig>>,
    execution_log: Mutex<ExecutionLog>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.read().keys().collect::<Vec<_>>())
            .field("agents", &self.agents.read().keys().collect::<Vec<_>>())
            .field("log_len", &self.execution_log.lock().len())
            .finish()
    }
}

impl ToolRegistry {
    /// Create an empty registry with the default log capacity
    pub fn new() -> Self {
        Self::with_log_capacity(super::log::DEFAULT_LOG_CAPACITY)
    }

    /// Create an empty registry retaining at most `capacity` log entries
    pub fn with_log_capacity(capacity: usize) -> Self {
        Self {
            tools: RwLock::new(BTreeMap::new()),
            agents: RwLock::new(BTreeMap::new()),
            execution_log: Mutex::new(ExecutionLog::with_capacity(capacity)),
        }
    }

    /// Create an empty registry from configuration
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::with_log_capacity(config.log_capacity)
    }

    /// Register a tool
    ///
    /// Fails with `AlreadyExists` on an id collision, checked first, and
    /// `InvalidMetadata` if id, name or description is empty. Nothing is
    /// stored on failure.
    pub fn register_tool(
        &self,
        metadata: ToolMetadata,
        callable: BoxedCallable,
        render_component: Option<RenderComponent>,
    ) -> Result<(), RegistryError> {
        let mut tools = self.tools.write();
        if tools.contains_key(&metadata.id) {
            return Err(RegistryError::tool_exists(&metadata.id));
        }
        validate_metadata(&metadata)?;

        tracing::info!(
            tool_id = %metadata.id,
            name = %metadata.name,
            category = %metadata.category,
            "Tool registered"
        );

        tools.insert(
            metadata.id.clone(),
            Arc::new(RegisteredTool {
                metadata,
                callable,
                render_component,
            }),
        );
        Ok(())
    }

    /// Register a tool from string-typed metadata
    ///
    /// Unknown categories or capabilities fail with `InvalidMetadata`.
    pub fn register_descriptor(
        &self,
        descriptor: ToolDescriptor,
        callable: BoxedCallable,
        render_component: Option<RenderComponent>,
    ) -> Result<(), RegistryError> {
        let metadata = ToolMetadata::try_from(descriptor)?;
        self.register_tool(metadata, callable, render_component)
    }

    /// Unregister a tool by id
    ///
    /// Returns the removed tool. Handles obtained earlier stay valid.
    pub fn unregister_tool(&self, id: &str) -> Result<Arc<RegisteredTool>, RegistryError> {
        let removed = self
            .tools
            .write()
            .remove(id)
            .ok_or_else(|| RegistryError::tool_not_found(id))?;

        tracing::info!(tool_id = %id, "Tool unregistered");
        Ok(removed)
    }

    /// Flip a tool's active flag
    pub fn set_tool_active(&self, id: &str, active: bool) -> Result<(), RegistryError> {
        let mut tools = self.tools.write();
        let tool = tools
            .get_mut(id)
            .ok_or_else(|| RegistryError::tool_not_found(id))?;

        if tool.metadata.is_active != active {
            let mut updated = RegisteredTool::clone(tool);
            updated.metadata.is_active = active;
            *tool = Arc::new(updated);
            tracing::info!(tool_id = %id, active, "Tool active flag changed");
        }
        Ok(())
    }

    /// Register an agent
    ///
    /// Only structural checks happen here (non-empty id and name, unique id).
    /// Semantic validation belongs to
    /// [`CapabilitiesManager`](crate::agents::CapabilitiesManager), which
    /// must run before this call.
    pub fn register_agent(&self, config: AgentConfig) -> Result<(), RegistryError> {
        let mut agents = self.agents.write();
        if agents.contains_key(&config.id) {
            return Err(RegistryError::agent_exists(&config.id));
        }
        validate_agent_structure(&config)?;

        tracing::info!(agent_id = %config.id, name = %config.name, "Agent registered");
        agents.insert(config.id.clone(), config);
        Ok(())
    }

    /// Replace the config of an already registered agent
    pub fn replace_agent(&self, config: AgentConfig) -> Result<(), RegistryError> {
        validate_agent_structure(&config)?;

        let mut agents = self.agents.write();
        let slot = agents
            .get_mut(&config.id)
            .ok_or_else(|| RegistryError::agent_not_found(&config.id))?;

        tracing::info!(agent_id = %config.id, "Agent config replaced");
        *slot = config;
        Ok(())
    }

    /// Tools the agent may use, ordered by tool id
    ///
    /// A tool is available iff it is active, every required capability is
    /// held by the agent, and its category is in the agent's allow-list.
    pub fn get_available_tools_for_agent(
        &self,
        agent_id: &str,
    ) -> Result<Vec<Arc<RegisteredTool>>, RegistryError> {
        let agent = self
            .get_agent(agent_id)
            .ok_or_else(|| RegistryError::agent_not_found(agent_id))?;

        let available: Vec<Arc<RegisteredTool>> = self
            .tools
            .read()
            .values()
            .filter(|tool| can_agent_access_tool(&agent, &tool.metadata))
            .cloned()
            .collect();

        tracing::debug!(
            agent_id = %agent_id,
            available = available.len(),
            "Resolved available tools"
        );
        Ok(available)
    }

    /// Available tools keyed by id, ready for the agent runtime to invoke
    pub fn get_tools_object_for_agent(
        &self,
        agent_id: &str,
    ) -> Result<BTreeMap<String, BoxedCallable>, RegistryError> {
        Ok(self
            .get_available_tools_for_agent(agent_id)?
            .into_iter()
            .map(|tool| (tool.metadata.id.clone(), Arc::clone(&tool.callable)))
            .collect())
    }

    /// Presentation adapter for a tool, if the tool exists and has one
    pub fn get_render_component(&self, tool_id: &str) -> Option<RenderComponent> {
        self.tools
            .read()
            .get(tool_id)
            .and_then(|tool| tool.render_component.clone())
    }

    /// Record a tool invocation
    pub fn log_execution(
        &self,
        context: ToolExecutionContext,
        tool_id: impl Into<String>,
        success: bool,
        duration: Duration,
        error: Option<String>,
    ) {
        let tool_id = tool_id.into();
        if !success {
            tracing::warn!(
                agent_id = %context.agent_id,
                tool_id = %tool_id,
                error = error.as_deref().unwrap_or("unknown"),
                "Tool execution failed"
            );
        }

        self.execution_log.lock().push(ExecutionLogEntry {
            context,
            tool_id,
            success,
            duration,
            error,
        });
    }

    /// The most recent `limit` log entries, oldest first
    pub fn get_execution_logs(&self, limit: usize) -> Vec<ExecutionLogEntry> {
        self.execution_log.lock().recent(limit)
    }

    /// Get all registered tools, ordered by id
    pub fn all_tools(&self) -> Vec<Arc<RegisteredTool>> {
        self.tools.read().values().cloned().collect()
    }

    /// Get all registered agents, ordered by id
    pub fn all_agents(&self) -> Vec<AgentConfig> {
        self.agents.read().values().cloned().collect()
    }

    /// Get a tool by id
    pub fn get_tool(&self, id: &str) -> Option<Arc<RegisteredTool>> {
        self.tools.read().get(id).cloned()
    }

    /// Get an agent by id
    pub fn get_agent(&self, id: &str) -> Option<AgentConfig> {
        self.agents.read().get(id).cloned()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.read().len()
    }

    /// Check if no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.read().is_empty()
    }

    /// Number of registered agents
    pub fn agent_count(&self) -> usize {
        self.agents.read().len()
    }
}

fn can_agent_access_tool(agent: &AgentConfig, metadata: &ToolMetadata) -> bool {
    metadata.is_active
        && agent.capabilities.contains_all(&metadata.required_capabilities)
        && agent.allowed_tool_categories.contains(&metadata.category)
}

fn validate_metadata(metadata: &ToolMetadata) -> Result<(), RegistryError> {
    for (field, value) in [
        ("id", &metadata.id),
        ("name", &metadata.name),
        ("description", &metadata.description),
    ] {
        if value.trim().is_empty() {
            return Err(RegistryError::invalid_metadata(
                &metadata.id,
                field,
                "must not be empty",
            ));
        }
    }
    Ok(())
}

fn validate_agent_structure(config: &AgentConfig) -> Result<(), RegistryError> {
    if config.id.trim().is_empty() {
        return Err(RegistryError::invalid_metadata(&config.id, "id", "must not be empty"));
    }
    if config.name.trim().is_empty() {
        return Err(RegistryError::invalid_metadata(&config.id, "name", "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{AgentCapability, FnCallable, ToolCategory};

    fn echo() -> BoxedCallable {
        FnCallable::boxed(|args, _ctx| Ok(args))
    }

    fn weather_tool() -> ToolMetadata {
        ToolMetadata::new(
            "getWeather",
            "Weather Information",
            "Get current weather information for a US location",
            ToolCategory::Weather,
        )
        .with_capability(AgentCapability::Basic)
    }

    #[test]
    fn test_register_and_get() {
        let registry = ToolRegistry::new();
        registry.register_tool(weather_tool(), echo(), None).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.get_tool("getWeather").is_some());
        assert!(registry.get_tool("nonexistent").is_none());
    }

    #[test]
    fn test_duplicate_registration() {
        let registry = ToolRegistry::new();
        registry.register_tool(weather_tool(), echo(), None).unwrap();

        let renamed = weather_tool().with_version("9.9.9");
        let err = registry.register_tool(renamed, echo(), None).unwrap_err();
        assert_eq!(err, RegistryError::tool_exists("getWeather"));

        let kept = registry.get_tool("getWeather").unwrap();
        assert_eq!(kept.metadata.version, "1.0.0");
    }

    #[test]
    fn test_empty_fields_rejected() {
        let registry = ToolRegistry::new();
        let metadata = ToolMetadata::new("calc", "Calculator", "  ", ToolCategory::Calculation);

        let err = registry.register_tool(metadata, echo(), None).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidMetadata { ref field, .. } if field == "description"
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_reported_before_invalid_metadata() {
        let registry = ToolRegistry::new();
        registry.register_tool(weather_tool(), echo(), None).unwrap();

        let invalid = ToolMetadata::new("getWeather", "Weather", "", ToolCategory::Weather);
        let err = registry.register_tool(invalid, echo(), None).unwrap_err();
        assert_eq!(err, RegistryError::tool_exists("getWeather"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let registry = ToolRegistry::new();
        registry.register_tool(weather_tool(), echo(), None).unwrap();

        let held = registry.get_tool("getWeather").unwrap();
        let removed = registry.unregister_tool("getWeather").unwrap();
        assert_eq!(removed.id(), "getWeather");
        assert_eq!(held.id(), "getWeather");
        assert!(registry.get_tool("getWeather").is_none());

        let err = registry.unregister_tool("getWeather").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_register_agent_duplicate() {
        let registry = ToolRegistry::new();
        let agent = AgentConfig::new("a", "Agent A").with_capability(AgentCapability::Basic);

        registry.register_agent(agent.clone()).unwrap();
        assert_eq!(
            registry.register_agent(agent).unwrap_err(),
            RegistryError::agent_exists("a")
        );
        assert_eq!(registry.agent_count(), 1);
    }

    #[test]
    fn test_register_agent_requires_name() {
        let registry = ToolRegistry::new();
        let err = registry.register_agent(AgentConfig::new("a", "")).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidMetadata { .. }));
    }

    #[test]
    fn test_agent_duplicate_reported_before_invalid_name() {
        let registry = ToolRegistry::new();
        registry.register_agent(AgentConfig::new("a", "Agent A")).unwrap();

        let err = registry.register_agent(AgentConfig::new("a", "")).unwrap_err();
        assert_eq!(err, RegistryError::agent_exists("a"));
    }

    #[test]
    fn test_replace_agent_unknown() {
        let registry = ToolRegistry::new();
        let err = registry
            .replace_agent(AgentConfig::new("ghost", "Ghost"))
            .unwrap_err();
        assert_eq!(err, RegistryError::agent_not_found("ghost"));
    }

    #[test]
    fn test_unknown_agent_lookup() {
        let registry = ToolRegistry::new();
        let err = registry.get_available_tools_for_agent("nobody").unwrap_err();
        assert_eq!(err.to_string(), "Agent with ID 'nobody' not found");
        assert!(registry.get_tools_object_for_agent("nobody").is_err());
    }

    #[test]
    fn test_set_tool_active() {
        let registry = ToolRegistry::new();
        registry.register_tool(weather_tool(), echo(), None).unwrap();
        registry
            .register_agent(
                AgentConfig::new("w", "Weather")
                    .with_capability(AgentCapability::Basic)
                    .with_category(ToolCategory::Weather),
            )
            .unwrap();

        registry.set_tool_active("getWeather", false).unwrap();
        assert!(registry.get_available_tools_for_agent("w").unwrap().is_empty());

        registry.set_tool_active("getWeather", true).unwrap();
        assert_eq!(registry.get_available_tools_for_agent("w").unwrap().len(), 1);

        assert!(registry.set_tool_active("missing", true).unwrap_err().is_not_found());
    }

    #[test]
    fn test_render_component() {
        let registry = ToolRegistry::new();
        let card: RenderComponent = Arc::new("WeatherCard");
        registry
            .register_tool(weather_tool(), echo(), Some(card))
            .unwrap();

        let component = registry.get_render_component("getWeather").unwrap();
        assert_eq!(component.downcast_ref::<&str>(), Some(&"WeatherCard"));
        assert!(registry.get_render_component("missing").is_none());
    }

    #[test]
    fn test_log_capacity_from_config() {
        let config = RegistryConfig {
            log_capacity: 2,
            ..Default::default()
        };
        let registry = ToolRegistry::from_config(&config);
        for _ in 0..5 {
            registry.log_execution(
                ToolExecutionContext::new("a", Default::default()),
                "t",
                true,
                Duration::from_millis(1),
                None,
            );
        }
        assert_eq!(registry.get_execution_logs(10).len(), 2);
    }
}
