//! Wiring of registry, capabilities manager and router from configuration

use crate::agents::{AgentConfig, CapabilitiesManager, presets};
use crate::config::SwitchboardConfig;
use crate::error::Result;
use crate::routing::CapabilityRouter;
use crate::tools::{ExecutionLogEntry, ToolRegistry};
use std::sync::Arc;

/// Explicitly owned instances of the registry, manager and router
///
/// Hand out clones of [`registry`](Self::registry) to whatever registers
/// tools; there is no process-wide instance.
#[derive(Debug)]
pub struct Switchboard {
    registry: Arc<ToolRegistry>,
    agents: CapabilitiesManager,
    router: CapabilityRouter,
    default_log_limit: usize,
}

impl Switchboard {
    /// Build everything from configuration and register startup agents
    ///
    /// # Errors
    ///
    /// Returns the first agent definition that fails validation or
    /// registration.
    pub fn from_config(config: &SwitchboardConfig) -> Result<Self> {
        config.validate()?;

        let registry = Arc::new(ToolRegistry::from_config(&config.registry));
        let agents = CapabilitiesManager::new(Arc::clone(&registry));
        let router = CapabilityRouter::from_config(&config.router);

        if config.agents.include_default_agents {
            for agent in presets::default_agent_configs() {
                agents.register_agent(agent)?;
            }
        }
        for descriptor in &config.agents.definitions {
            agents.register_descriptor(descriptor.clone())?;
        }

        tracing::info!(
            agents = agents.all_agents().len(),
            providers = router.registered_providers().len(),
            "Switchboard initialized"
        );

        Ok(Self {
            registry,
            agents,
            router,
            default_log_limit: config.registry.default_log_limit,
        })
    }

    /// Shared tool registry
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Capabilities manager bound to the registry
    pub fn agents(&self) -> &CapabilitiesManager {
        &self.agents
    }

    /// Capability router
    pub fn router(&self) -> &CapabilityRouter {
        &self.router
    }

    /// Validate and register an agent
    pub fn register_agent(&self, config: AgentConfig) -> Result<()> {
        Ok(self.agents.register_agent(config)?)
    }

    /// Most recent execution log entries, up to the configured default limit
    pub fn recent_executions(&self) -> Vec<ExecutionLogEntry> {
        self.registry.get_execution_logs(self.default_log_limit)
    }
}

impl Default for Switchboard {
    fn default() -> Self {
        let registry = Arc::new(ToolRegistry::new());
        Self {
            agents: CapabilitiesManager::new(Arc::clone(&registry)),
            registry,
            router: CapabilityRouter::new(),
            default_log_limit: crate::tools::DEFAULT_LOG_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentDescriptor;
    use crate::config::AgentsConfig;
    use crate::error::SwitchboardError;
    use crate::tools::{CapabilitySet, ToolExecutionContext};
    use std::time::Duration;

    #[test]
    fn test_default_agents_registered_in_both_places() {
        let mut config = SwitchboardConfig::default();
        config.agents.include_default_agents = true;

        let switchboard = Switchboard::from_config(&config).unwrap();
        assert_eq!(switchboard.agents().all_agents().len(), 5);
        assert_eq!(switchboard.registry().agent_count(), 5);
    }

    #[test]
    fn test_invalid_definition_fails_startup() {
        let config = SwitchboardConfig {
            agents: AgentsConfig {
                include_default_agents: false,
                definitions: vec![AgentDescriptor {
                    id: "bad".into(),
                    name: "Bad".into(),
                    capabilities: vec!["basic".into()],
                    allowed_tool_categories: vec!["utility".into()],
                    max_concurrent_tools: 1,
                    timeout_ms: 5,
                }],
            },
            ..Default::default()
        };

        let err = Switchboard::from_config(&config).unwrap_err();
        assert!(matches!(err, SwitchboardError::AgentConfig(_)));
    }

    #[test]
    fn test_recent_executions_uses_configured_limit() {
        let mut config = SwitchboardConfig::default();
        config.registry.default_log_limit = 3;
        let switchboard = Switchboard::from_config(&config).unwrap();

        for _ in 0..5 {
            switchboard.registry().log_execution(
                ToolExecutionContext::new("agent", CapabilitySet::new()),
                "noop",
                true,
                Duration::from_millis(1),
                None,
            );
        }
        assert_eq!(switchboard.recent_executions().len(), 3);
    }

    #[test]
    fn test_huge_log_capacity_boots() {
        let mut config = SwitchboardConfig::default();
        config.registry.log_capacity = usize::MAX / 2;
        config.validate().unwrap();

        let switchboard = Switchboard::from_config(&config).unwrap();
        switchboard.registry().log_execution(
            ToolExecutionContext::new("agent", CapabilitySet::new()),
            "noop",
            true,
            Duration::from_millis(1),
            None,
        );
        assert_eq!(switchboard.registry().get_execution_logs(10).len(), 1);
    }
}
