//! Configuration types for the switchboard

use crate::agents::AgentDescriptor;
use crate::error::{Result, SwitchboardError};
use crate::routing::{ProviderCapability, RoutingRules};
use crate::tools::{DEFAULT_LOG_CAPACITY, DEFAULT_LOG_LIMIT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default config file name looked up by [`SwitchboardConfig::load`]
pub const CONFIG_FILE: &str = "switchboard.toml";

/// Env var naming an extra config file merged last
pub const CONFIG_PATH_ENV: &str = "SWITCHBOARD_CONFIG_PATH";

/// Prefix for env var overrides, e.g. `SWITCHBOARD_ROUTER__FALLBACK_ALLOWED`
pub const ENV_PREFIX: &str = "SWITCHBOARD_";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchboardConfig {
    /// Tool registry settings
    pub registry: RegistryConfig,

    /// Capability router settings
    pub router: RouterConfig,

    /// Agents registered at startup
    pub agents: AgentsConfig,
}

/// Tool registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Execution log entries retained before FIFO eviction
    pub log_capacity: usize,

    /// Entries returned by a log query without an explicit limit
    pub default_log_limit: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_LOG_CAPACITY,
            default_log_limit: DEFAULT_LOG_LIMIT,
        }
    }
}

/// Capability router configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Whether `route` may switch away from the requested provider
    pub fallback_allowed: bool,

    /// Start from the built-in provider table
    pub include_default_providers: bool,

    /// Extra or overriding provider descriptors keyed by id
    pub providers: BTreeMap<String, ProviderCapability>,

    /// Candidate list overrides per request capability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<RoutingRules>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            fallback_allowed: true,
            include_default_providers: true,
            providers: BTreeMap::new(),
            rules: None,
        }
    }
}

/// Startup agent configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    /// Register the preset agents before `definitions`
    pub include_default_agents: bool,

    /// Agents to validate and register
    pub definitions: Vec<AgentDescriptor>,
}

/// Builder for programmatic configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: SwitchboardConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set registry configuration
    pub fn registry(mut self, config: RegistryConfig) -> Self {
        self.config.registry = config;
        self
    }

    /// Set router configuration
    pub fn router(mut self, config: RouterConfig) -> Self {
        self.config.router = config;
        self
    }

    /// Set agents configuration
    pub fn agents(mut self, config: AgentsConfig) -> Self {
        self.config.agents = config;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<SwitchboardConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl SwitchboardConfig {
    /// Start a [`ConfigBuilder`]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Load configuration from file and environment variables.
    ///
    /// Loads in this order:
    /// 1. Defaults
    /// 2. `switchboard.toml` in the working directory
    /// 3. `SWITCHBOARD_`-prefixed env vars, nested with `__`
    /// 4. The file named by `SWITCHBOARD_CONFIG_PATH`
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or validation fails.
    pub fn load() -> Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Toml},
        };

        let mut figment = Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config_path"]).split("__"));

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            tracing::debug!(path = %path, "Merging configuration file from environment");
            figment = figment.merge(Toml::file(path));
        }

        let config: SwitchboardConfig = figment.extract().map_err(|e| {
            SwitchboardError::Configuration(format!("Failed to load configuration: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file.
    ///
    /// The format follows the extension: `.yaml`/`.yml`, `.json`, anything
    /// else is read as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, cannot be parsed, or fails
    /// validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        use figment::{
            Figment,
            providers::{Format, Json, Toml, Yaml},
        };

        let path = path.as_ref();
        if !path.is_file() {
            return Err(SwitchboardError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let figment = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Figment::new().merge(Yaml::file(path)),
            Some("json") => Figment::new().merge(Json::file(path)),
            _ => Figment::new().merge(Toml::file(path)),
        };

        let config: SwitchboardConfig = figment.extract().map_err(|e| {
            SwitchboardError::Configuration(format!("Failed to load configuration file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Agent definitions are checked when they are registered, not here.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric bound or provider entry is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.registry.log_capacity < 1 {
            return Err(SwitchboardError::Configuration(
                "registry.log_capacity must be at least 1".to_string(),
            ));
        }

        for (id, provider) in &self.router.providers {
            if id.trim().is_empty() {
                return Err(SwitchboardError::Configuration(
                    "router.providers contains an empty provider id".to_string(),
                ));
            }
            if provider.name.trim().is_empty() {
                return Err(SwitchboardError::Configuration(format!(
                    "router.providers.{} must have a name",
                    id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RequestCapability;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SwitchboardConfig::default();
        assert_eq!(config.registry.log_capacity, 1000);
        assert_eq!(config.registry.default_log_limit, 100);
        assert!(config.router.fallback_allowed);
        assert!(config.router.include_default_providers);
        assert!(!config.agents.include_default_agents);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[registry]
log_capacity = 50

[router]
fallback_allowed = false

[router.providers."local/llava"]
name = "LLaVA"
supportsVision = true
supportsStreaming = true
maxTokens = 4096

[router.rules]
needs_vision = ["local/llava", "openai/gpt-4o"]

[[agents.definitions]]
id = "helper"
name = "Helper"
capabilities = ["basic"]
allowedToolCategories = ["utility"]
"#
        )
        .unwrap();

        let config = SwitchboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.registry.log_capacity, 50);
        assert_eq!(config.registry.default_log_limit, 100);
        assert!(!config.router.fallback_allowed);
        assert!(config.router.providers["local/llava"].supports_vision);

        let rules = config.router.rules.unwrap();
        assert_eq!(rules.candidates(RequestCapability::NeedsVision).len(), 2);

        assert_eq!(config.agents.definitions.len(), 1);
        assert_eq!(config.agents.definitions[0].timeout_ms, 30_000);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "registry": {{ "default_log_limit": 10 }} }}"#).unwrap();

        let config = SwitchboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.registry.default_log_limit, 10);
        assert_eq!(config.registry.log_capacity, 1000);
    }

    #[test]
    fn test_zero_log_capacity_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[registry]\nlog_capacity = 0\n").unwrap();

        let err = SwitchboardConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, SwitchboardError::Configuration(_)));
        assert!(err.to_string().contains("log_capacity"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SwitchboardConfig::from_file(dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[registry]\nlog_capacity = \"lots\"\n").unwrap();

        assert!(matches!(
            SwitchboardConfig::from_file(file.path()),
            Err(SwitchboardError::Configuration(_))
        ));
    }

    #[test]
    fn test_builder_validates() {
        let err = SwitchboardConfig::builder()
            .registry(RegistryConfig {
                log_capacity: 0,
                ..Default::default()
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, SwitchboardError::Configuration(_)));

        let config = SwitchboardConfig::builder()
            .router(RouterConfig {
                fallback_allowed: false,
                ..Default::default()
            })
            .build()
            .unwrap();
        assert!(!config.router.fallback_allowed);
    }

    #[test]
    fn test_load_layers_file_then_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
[registry]
log_capacity = 10
default_log_limit = 5
"#,
            )?;
            jail.create_file("extra.toml", "[agents]\ninclude_default_agents = true\n")?;
            jail.set_env("SWITCHBOARD_REGISTRY__LOG_CAPACITY", "20");
            jail.set_env("SWITCHBOARD_ROUTER__FALLBACK_ALLOWED", "false");
            jail.set_env(CONFIG_PATH_ENV, "extra.toml");

            let config = SwitchboardConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.registry.log_capacity, 20);
            assert_eq!(config.registry.default_log_limit, 5);
            assert!(!config.router.fallback_allowed);
            assert!(config.agents.include_default_agents);
            Ok(())
        });
    }
}
