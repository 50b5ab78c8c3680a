//! Agent capabilities manager
//!
//! Owns semantic validation of agent configs (enum membership, non-empty
//! capability and category lists, numeric bounds) and hands validated configs
//! to the [`ToolRegistry`], whose own checks are structural only.

use super::config::{AgentConfig, AgentDescriptor, MIN_TIMEOUT_MS};
use crate::tools::{AgentCapability, CapabilitySet, RegistryError, ToolCategory, ToolRegistry};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Semantic validation failures for agent configs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentConfigError {
    /// id or name missing
    #[error("Agent config must include {0}")]
    MissingField(&'static str),

    /// Empty capability list
    #[error("Agent must have at least one capability")]
    NoCapabilities,

    /// Empty category allow-list
    #[error("Agent must have at least one allowed tool category")]
    NoCategories,

    /// Capability string outside the closed enumeration
    #[error("Invalid capability: {0}")]
    InvalidCapability(String),

    /// Category string outside the closed enumeration
    #[error("Invalid tool category: {0}")]
    InvalidCategory(String),

    /// `max_concurrent_tools` below 1
    #[error("maxConcurrentTools must be at least 1, got {0}")]
    MaxConcurrentTools(u32),

    /// `timeout_ms` below the minimum
    #[error("timeoutMs must be at least 1000ms, got {0}")]
    Timeout(u64),

    /// Unknown agent id
    #[error("Agent {0} not found")]
    NotFound(String),

    /// The registry rejected the validated config
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl TryFrom<AgentDescriptor> for AgentConfig {
    type Error = AgentConfigError;

    fn try_from(raw: AgentDescriptor) -> Result<Self, Self::Error> {
        let capabilities = raw
            .capabilities
            .iter()
            .map(|c| {
                c.parse::<AgentCapability>()
                    .map_err(|_| AgentConfigError::InvalidCapability(c.clone()))
            })
            .collect::<Result<CapabilitySet, _>>()?;

        let allowed_tool_categories = raw
            .allowed_tool_categories
            .iter()
            .map(|c| {
                c.parse::<ToolCategory>()
                    .map_err(|_| AgentConfigError::InvalidCategory(c.clone()))
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Self {
            id: raw.id,
            name: raw.name,
            capabilities,
            allowed_tool_categories,
            max_concurrent_tools: raw.max_concurrent_tools,
            timeout_ms: raw.timeout_ms,
        })
    }
}

/// Validate an agent config before registration
pub fn validate_agent_config(config: &AgentConfig) -> Result<(), AgentConfigError> {
    if config.id.trim().is_empty() {
        return Err(AgentConfigError::MissingField("id"));
    }
    if config.name.trim().is_empty() {
        return Err(AgentConfigError::MissingField("name"));
    }
    if config.capabilities.is_empty() {
        return Err(AgentConfigError::NoCapabilities);
    }
    if config.allowed_tool_categories.is_empty() {
        return Err(AgentConfigError::NoCategories);
    }
    if config.max_concurrent_tools < 1 {
        return Err(AgentConfigError::MaxConcurrentTools(config.max_concurrent_tools));
    }
    if config.timeout_ms < MIN_TIMEOUT_MS {
        return Err(AgentConfigError::Timeout(config.timeout_ms));
    }
    Ok(())
}

/// Validates and tracks agent configs, registering them with a shared registry
#[derive(Debug)]
pub struct CapabilitiesManager {
    registry: Arc<ToolRegistry>,
    agents: RwLock<BTreeMap<String, AgentConfig>>,
}

impl CapabilitiesManager {
    /// Create a manager bound to a registry
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            agents: RwLock::new(BTreeMap::new()),
        }
    }

    /// The registry this manager registers agents with
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Validate and register an agent
    pub fn register_agent(&self, config: AgentConfig) -> Result<(), AgentConfigError> {
        validate_agent_config(&config)?;
        self.registry.register_agent(config.clone())?;

        tracing::debug!(
            agent_id = %config.id,
            capabilities = %config.capabilities,
            "Agent registered with capabilities"
        );
        self.agents.write().insert(config.id.clone(), config);
        Ok(())
    }

    /// Parse, validate and register an agent from its string form
    pub fn register_descriptor(&self, descriptor: AgentDescriptor) -> Result<(), AgentConfigError> {
        self.register_agent(AgentConfig::try_from(descriptor)?)
    }

    /// Replace an agent's capabilities in both the manager and the registry
    pub fn update_agent_capabilities(
        &self,
        agent_id: &str,
        capabilities: CapabilitySet,
    ) -> Result<(), AgentConfigError> {
        let mut updated = self
            .agent_config(agent_id)
            .ok_or_else(|| AgentConfigError::NotFound(agent_id.to_string()))?;
        updated.capabilities = capabilities;

        validate_agent_config(&updated)?;
        self.registry.replace_agent(updated.clone())?;

        tracing::info!(
            agent_id = %agent_id,
            capabilities = %updated.capabilities,
            "Agent capabilities updated"
        );
        self.agents.write().insert(updated.id.clone(), updated);
        Ok(())
    }

    /// Check if the agent holds a capability
    pub fn has_capability(&self, agent_id: &str, capability: AgentCapability) -> bool {
        self.agents
            .read()
            .get(agent_id)
            .is_some_and(|a| a.capabilities.contains(capability))
    }

    /// Check if the agent may draw from a tool category
    pub fn can_access_category(&self, agent_id: &str, category: ToolCategory) -> bool {
        self.agents
            .read()
            .get(agent_id)
            .is_some_and(|a| a.allowed_tool_categories.contains(&category))
    }

    /// Get an agent's config
    pub fn agent_config(&self, agent_id: &str) -> Option<AgentConfig> {
        self.agents.read().get(agent_id).cloned()
    }

    /// All agents registered through this manager, ordered by id
    pub fn all_agents(&self) -> Vec<AgentConfig> {
        self.agents.read().values().cloned().collect()
    }

    /// Agents holding a capability
    pub fn agents_by_capability(&self, capability: AgentCapability) -> Vec<AgentConfig> {
        self.agents
            .read()
            .values()
            .filter(|a| a.capabilities.contains(capability))
            .cloned()
            .collect()
    }

    /// Agents allowed to use a tool category
    pub fn agents_for_category(&self, category: ToolCategory) -> Vec<AgentConfig> {
        self.agents
            .read()
            .values()
            .filter(|a| a.allowed_tool_categories.contains(&category))
            .cloned()
            .collect()
    }
}
