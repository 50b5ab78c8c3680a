//! Stock agent configurations for common deployments

use super::config::AgentConfig;
use crate::tools::{AgentCapability, CapabilitySet, ToolCategory};

/// Basic assistant: search and utility tools only
pub fn basic_assistant() -> AgentConfig {
    AgentConfig::new("basic-assistant", "Basic Assistant")
        .with_capability(AgentCapability::Basic)
        .with_categories([ToolCategory::Utility, ToolCategory::Search])
        .with_max_concurrent_tools(2)
        .with_timeout_ms(30_000)
}

/// Advanced assistant: everything except communication tools
pub fn advanced_assistant() -> AgentConfig {
    AgentConfig::new("advanced-assistant", "Advanced Assistant")
        .with_capability(AgentCapability::Basic)
        .with_capability(AgentCapability::Advanced)
        .with_categories([
            ToolCategory::Utility,
            ToolCategory::Search,
            ToolCategory::Calculation,
            ToolCategory::Weather,
            ToolCategory::DataProcessing,
        ])
        .with_max_concurrent_tools(5)
        .with_timeout_ms(60_000)
}

/// Admin assistant: every tier, every category
pub fn admin_assistant() -> AgentConfig {
    AgentConfig::new("admin-assistant", "Admin Assistant")
        .with_capabilities(CapabilitySet::all())
        .with_categories(ToolCategory::all().iter().copied())
        .with_max_concurrent_tools(10)
        .with_timeout_ms(120_000)
}

pub fn weather_specialist() -> AgentConfig {
    AgentConfig::new("weather-specialist", "Weather Specialist")
        .with_capability(AgentCapability::Basic)
        .with_category(ToolCategory::Weather)
        .with_max_concurrent_tools(3)
        .with_timeout_ms(30_000)
}

pub fn data_processor() -> AgentConfig {
    AgentConfig::new("data-processor", "Data Processor")
        .with_capability(AgentCapability::Basic)
        .with_capability(AgentCapability::Advanced)
        .with_categories([ToolCategory::DataProcessing, ToolCategory::Calculation])
        .with_max_concurrent_tools(4)
        .with_timeout_ms(90_000)
}

/// All stock configurations
pub fn default_agent_configs() -> Vec<AgentConfig> {
    vec![
        basic_assistant(),
        advanced_assistant(),
        admin_assistant(),
        weather_specialist(),
        data_processor(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::validate_agent_config;

    #[test]
    fn test_presets_pass_validation() {
        for config in default_agent_configs() {
            assert!(
                validate_agent_config(&config).is_ok(),
                "preset {} should be valid",
                config.id
            );
        }
    }

    #[test]
    fn test_admin_has_everything() {
        let admin = admin_assistant();
        assert_eq!(admin.capabilities.len(), 3);
        assert_eq!(admin.allowed_tool_categories.len(), ToolCategory::all().len());
    }
}
