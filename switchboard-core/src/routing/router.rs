//! Capability-based provider selection

use super::analyzer;
use super::capability::{RequestCapability, RequestContext};
use super::provider::{ProviderCapability, default_providers};
use super::rules::RoutingRules;
use crate::config::RouterConfig;
use crate::tools::CapabilitySet;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of a routing call
///
/// Routing never fails. Callers detect an unserviceable request through
/// [`is_satisfied`](Self::is_satisfied).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
    pub selected_provider: String,
    /// Currently always the provider id
    pub selected_model: String,
    pub fallback_used: bool,
    /// Set only when a fallback was chosen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_provider: Option<String>,
    pub reason: String,
    /// Capabilities the requested provider failed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmet_capabilities: Vec<RequestCapability>,
    /// Selected provider has a descriptor meeting every flagged requirement
    #[serde(default)]
    pub selected_verified: bool,
}

impl RoutingDecision {
    fn keep(provider: &str, reason: String, unmet: Vec<RequestCapability>, verified: bool) -> Self {
        Self {
            selected_provider: provider.to_string(),
            selected_model: provider.to_string(),
            fallback_used: false,
            original_provider: None,
            reason,
            unmet_capabilities: unmet,
            selected_verified: verified,
        }
    }

    fn fallback(candidate: Fallback, original: &str, unmet: Vec<RequestCapability>) -> Self {
        let provider = candidate.provider;
        Self {
            reason: format!("Switched to {} - supports required capabilities", provider),
            selected_model: provider.clone(),
            selected_provider: provider,
            fallback_used: true,
            original_provider: Some(original.to_string()),
            unmet_capabilities: unmet,
            selected_verified: candidate.fit == Fit::Full,
        }
    }

    /// Check if the selected provider is known to satisfy the request
    ///
    /// False when the selected provider has no descriptor, including a
    /// fallback taken from the rule table alone.
    pub fn is_satisfied(&self) -> bool {
        self.selected_verified
    }
}

/// How well a fallback candidate's descriptor covers the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Fit {
    /// No descriptor registered
    Unknown,
    Partial,
    Full,
}

#[derive(Debug)]
struct Fallback {
    provider: String,
    score: usize,
    fit: Fit,
}

/// Routes requests to providers based on inferred capabilities
#[derive(Debug)]
pub struct CapabilityRouter {
    providers: RwLock<BTreeMap<String, ProviderCapability>>,
    rules: RoutingRules,
    fallback_allowed: bool,
}

impl Default for CapabilityRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityRouter {
    /// Router with the built-in provider table and rules
    pub fn new() -> Self {
        Self::with_tables(default_providers(), RoutingRules::defaults())
    }

    /// Router over explicit tables
    pub fn with_tables(providers: BTreeMap<String, ProviderCapability>, rules: RoutingRules) -> Self {
        Self {
            providers: RwLock::new(providers),
            rules,
            fallback_allowed: true,
        }
    }

    /// Router built from configuration
    ///
    /// Configured providers overlay the built-in table (or replace it when
    /// `include_default_providers` is off). Configured rules replace the
    /// built-in list per capability.
    pub fn from_config(config: &RouterConfig) -> Self {
        let mut providers = if config.include_default_providers {
            default_providers()
        } else {
            BTreeMap::new()
        };
        providers.extend(config.providers.clone());

        let mut rules = RoutingRules::defaults();
        if let Some(overrides) = &config.rules {
            rules.merge(overrides.clone());
        }

        tracing::debug!(
            providers = providers.len(),
            rules = rules.len(),
            fallback_allowed = config.fallback_allowed,
            "Capability router configured"
        );

        Self {
            providers: RwLock::new(providers),
            rules,
            fallback_allowed: config.fallback_allowed,
        }
    }

    /// Default `fallback_allowed` used by [`route`](Self::route)
    pub fn fallback_allowed(&self) -> bool {
        self.fallback_allowed
    }

    /// The routing-rule table
    pub fn rules(&self) -> &RoutingRules {
        &self.rules
    }

    /// Infer the capabilities a request needs
    pub fn analyze_request(
        &self,
        message: &str,
        agent_capabilities: &CapabilitySet,
        context: Option<&RequestContext>,
    ) -> Vec<RequestCapability> {
        analyzer::analyze_request(message, agent_capabilities, context)
    }

    /// Route using the configured fallback policy
    pub fn route(&self, requested_provider: &str, required: &[RequestCapability]) -> RoutingDecision {
        self.route_request(requested_provider, required, self.fallback_allowed)
    }

    /// Decide which provider serves a request
    ///
    /// Keeps the requested provider when it satisfies every requirement.
    /// Otherwise, when allowed, picks the highest scoring other provider
    /// from the rule table. Among equal scores a registered provider that
    /// meets every flagged requirement wins over a partial one, which wins
    /// over an unregistered one; remaining ties go to rule-table order.
    pub fn route_request(
        &self,
        requested_provider: &str,
        required: &[RequestCapability],
        fallback_allowed: bool,
    ) -> RoutingDecision {
        let (known, unmet) = match self.providers.read().get(requested_provider) {
            Some(provider) => (true, provider.unmet(required)),
            // Unknown providers satisfy nothing with a flag
            None => (false, ProviderCapability::new(requested_provider, 0).unmet(required)),
        };

        if known && unmet.is_empty() {
            let decision = RoutingDecision::keep(
                requested_provider,
                "Requested provider supports all required capabilities".to_string(),
                Vec::new(),
                true,
            );
            tracing::debug!(provider = %requested_provider, "Requested provider satisfies request");
            return decision;
        }

        if !fallback_allowed {
            tracing::debug!(
                provider = %requested_provider,
                unmet = ?unmet,
                "Fallback disabled, keeping requested provider"
            );
            return RoutingDecision::keep(
                requested_provider,
                format!(
                    "Provider {} does not support required capabilities: {}",
                    requested_provider,
                    join(required)
                ),
                unmet,
                false,
            );
        }

        match self.best_fallback(requested_provider, required) {
            Some(candidate) => {
                tracing::warn!(
                    requested = %requested_provider,
                    selected = %candidate.provider,
                    fit = ?candidate.fit,
                    unmet = ?unmet,
                    "Routing to fallback provider"
                );
                RoutingDecision::fallback(candidate, requested_provider, unmet)
            }
            None => {
                tracing::warn!(
                    provider = %requested_provider,
                    required = ?required,
                    "No provider satisfies required capabilities"
                );
                RoutingDecision::keep(
                    requested_provider,
                    format!(
                        "No provider found that supports required capabilities: {}",
                        join(required)
                    ),
                    unmet,
                    false,
                )
            }
        }
    }

    fn best_fallback(&self, requested_provider: &str, required: &[RequestCapability]) -> Option<Fallback> {
        let providers = self.providers.read();
        let mut best: Option<Fallback> = None;
        // Scores arrive in first-seen order; only a strictly better pair replaces
        for (provider, score) in self.rules.score(required) {
            if provider == requested_provider {
                continue;
            }
            let fit = match providers.get(&provider) {
                Some(descriptor) if descriptor.unmet(required).is_empty() => Fit::Full,
                Some(_) => Fit::Partial,
                None => Fit::Unknown,
            };
            if best
                .as_ref()
                .is_none_or(|top| (score, fit) > (top.score, top.fit))
            {
                best = Some(Fallback { provider, score, fit });
            }
        }
        best
    }

    /// Insert or overwrite a provider descriptor
    pub fn register_provider_capability(&self, provider_id: impl Into<String>, capability: ProviderCapability) {
        let provider_id = provider_id.into();
        tracing::info!(provider = %provider_id, name = %capability.name, "Provider capability registered");
        self.providers.write().insert(provider_id, capability);
    }

    /// Registered provider ids, sorted
    pub fn registered_providers(&self) -> Vec<String> {
        self.providers.read().keys().cloned().collect()
    }

    /// Descriptor for a provider
    pub fn provider_capability(&self, provider_id: &str) -> Option<ProviderCapability> {
        self.providers.read().get(provider_id).cloned()
    }
}

fn join(capabilities: &[RequestCapability]) -> String {
    capabilities
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use RequestCapability::*;

    #[test]
    fn test_requested_provider_kept_when_satisfied() {
        let router = CapabilityRouter::new();
        let decision = router.route_request("openai/gpt-4o", &[NeedsTools, NeedsStreaming], true);

        assert_eq!(decision.selected_provider, "openai/gpt-4o");
        assert_eq!(decision.selected_model, "openai/gpt-4o");
        assert!(!decision.fallback_used);
        assert_eq!(decision.original_provider, None);
        assert_eq!(decision.reason, "Requested provider supports all required capabilities");
        assert!(decision.is_satisfied());
    }

    #[test]
    fn test_vision_fallback_tie_break() {
        let router = CapabilityRouter::new();
        let decision = router.route_request("openai/gpt-4-turbo", &[NeedsVision], true);

        // gpt-4o, claude-3 and gemini-pro-vision tie; gpt-4o is listed first
        assert!(decision.fallback_used);
        assert_eq!(decision.selected_provider, "openai/gpt-4o");
        assert_eq!(decision.original_provider.as_deref(), Some("openai/gpt-4-turbo"));
        assert_eq!(decision.unmet_capabilities, vec![NeedsVision]);
        assert_eq!(
            decision.reason,
            "Switched to openai/gpt-4o - supports required capabilities"
        );
        assert!(router.provider_capability(&decision.selected_provider).unwrap().supports_vision);
        assert!(decision.is_satisfied());
    }

    #[test]
    fn test_fallback_prefers_registered_provider() {
        let router = CapabilityRouter::new();

        let decision = router.route_request("openai/gpt-4o", &[NeedsImageGen], true);
        assert_eq!(decision.selected_provider, "openai/dall-e-3");
        assert!(decision.is_satisfied());

        let decision = router.route_request("openai/gpt-4o", &[NeedsAudioOut], true);
        assert_eq!(decision.selected_provider, "openai/tts");
        assert!(decision.is_satisfied());

        // Both candidates lack a descriptor: rule order decides, unverified
        let decision = router.route_request("openai/gpt-4o", &[NeedsAudioIn], true);
        assert!(decision.fallback_used);
        assert_eq!(decision.selected_provider, "openai/whisper");
        assert!(!decision.is_satisfied());
    }

    #[test]
    fn test_registered_candidate_beats_earlier_unknown() {
        let router = CapabilityRouter::new();
        router.register_provider_capability(
            "midjourney/midjourney",
            ProviderCapability::new("Midjourney", 1000).with_image_gen(),
        );
        router.register_provider_capability(
            "openai/dall-e-3",
            ProviderCapability::new("DALL-E 3", 4000),
        );

        // dall-e-3 is listed first but no longer generates images
        let decision = router.route_request("openai/gpt-4o", &[NeedsImageGen], true);
        assert_eq!(decision.selected_provider, "midjourney/midjourney");
        assert!(decision.is_satisfied());
    }

    #[test]
    fn test_unknown_provider_without_fallback() {
        let router = CapabilityRouter::new();
        let decision = router.route_request("unknown-provider", &[NeedsTools], false);

        assert_eq!(decision.selected_provider, "unknown-provider");
        assert_eq!(decision.selected_model, "unknown-provider");
        assert!(!decision.fallback_used);
        assert_eq!(decision.original_provider, None);
        assert_eq!(
            decision.reason,
            "Provider unknown-provider does not support required capabilities: needs_tools"
        );
        assert_eq!(decision.unmet_capabilities, vec![NeedsTools]);
        assert!(!decision.is_satisfied());
    }

    #[test]
    fn test_fallback_disabled() {
        let router = CapabilityRouter::new();
        let decision = router.route_request("openai/tts", &[NeedsVision, NeedsStreaming], false);

        assert_eq!(decision.selected_provider, "openai/tts");
        assert!(!decision.fallback_used);
        assert_eq!(
            decision.reason,
            "Provider openai/tts does not support required capabilities: needs_vision, needs_streaming"
        );
        assert_eq!(decision.unmet_capabilities, vec![NeedsVision, NeedsStreaming]);
        assert!(!decision.is_satisfied());
    }

    #[test]
    fn test_unknown_provider_falls_back() {
        let router = CapabilityRouter::new();
        let decision = router.route_request("acme/unknown", &[NeedsStreaming, BasicChat], true);

        assert!(decision.fallback_used);
        assert_eq!(decision.selected_provider, "openai/gpt-4o");
        assert_eq!(decision.unmet_capabilities, vec![NeedsStreaming]);
        assert!(decision.is_satisfied());
    }

    #[test]
    fn test_unknown_provider_basic_chat_only() {
        // Nothing to score and nothing known about the provider
        let router = CapabilityRouter::new();
        let decision = router.route_request("acme/unknown", &[BasicChat], true);

        assert!(!decision.fallback_used);
        assert_eq!(decision.selected_provider, "acme/unknown");
        assert_eq!(
            decision.reason,
            "No provider found that supports required capabilities: basic_chat"
        );
        assert!(decision.unmet_capabilities.is_empty());
        assert!(!decision.is_satisfied());
    }

    #[test]
    fn test_code_gen_always_satisfied() {
        let router = CapabilityRouter::new();
        let decision = router.route_request("openai/dall-e-3", &[NeedsCodeGen, NeedsImageGen], true);
        assert!(!decision.fallback_used);
        assert_eq!(decision.selected_provider, "openai/dall-e-3");
    }

    #[test]
    fn test_requested_provider_excluded_from_fallback() {
        let router = CapabilityRouter::new();
        // gpt-4o lacks audio output but scores highest on the other lists
        let decision = router.route_request("openai/gpt-4o", &[NeedsTools, NeedsStreaming, NeedsAudioOut], true);

        assert!(decision.fallback_used);
        assert_eq!(decision.selected_provider, "anthropic/claude-3");
        assert!(!decision.is_satisfied());
    }

    #[test]
    fn test_highest_score_wins() {
        let router = CapabilityRouter::new();
        let decision = router.route_request("openai/dall-e-3", &[NeedsTools, NeedsStreaming], true);

        // gpt-4o, claude-3 and gpt-4-turbo all score 2 and fit; gpt-4o is listed first
        assert_eq!(decision.selected_provider, "openai/gpt-4o");

        let decision = router.route_request("openai/dall-e-3", &[NeedsVision, NeedsStreaming], true);
        assert_eq!(decision.selected_provider, "openai/gpt-4o");

        // A higher score beats a better fit
        let decision = router.route_request("openai/tts", &[NeedsTools, NeedsStreaming, NeedsAudioOut], true);
        assert_eq!(decision.selected_provider, "openai/gpt-4o");
        assert!(!decision.is_satisfied());
    }

    #[test]
    fn test_route_uses_configured_policy() {
        let config = RouterConfig {
            fallback_allowed: false,
            ..RouterConfig::default()
        };
        let router = CapabilityRouter::from_config(&config);
        let decision = router.route("openai/tts", &[NeedsVision]);
        assert!(!decision.fallback_used);
        assert_eq!(decision.selected_provider, "openai/tts");
    }

    #[test]
    fn test_register_provider_visible_to_routing() {
        let router = CapabilityRouter::new();
        assert!(router.provider_capability("local/llava").is_none());

        router.register_provider_capability(
            "local/llava",
            ProviderCapability::new("LLaVA", 4096).with_vision().with_streaming(),
        );

        let decision = router.route_request("local/llava", &[NeedsVision, NeedsStreaming], true);
        assert!(!decision.fallback_used);
        assert_eq!(decision.selected_provider, "local/llava");
        assert!(router.registered_providers().contains(&"local/llava".to_string()));
    }

    #[test]
    fn test_register_overwrites() {
        let router = CapabilityRouter::new();
        router.register_provider_capability(
            "openai/tts",
            ProviderCapability::new("TTS v2", 4096).with_audio_out().with_streaming(),
        );

        assert_eq!(router.provider_capability("openai/tts").unwrap().name, "TTS v2");
        assert_eq!(router.registered_providers().len(), 7);
    }

    #[test]
    fn test_registered_providers_sorted() {
        let providers = CapabilityRouter::new().registered_providers();
        let mut sorted = providers.clone();
        sorted.sort();
        assert_eq!(providers, sorted);
        assert_eq!(providers[0], "anthropic/claude-3");
    }

    #[test]
    fn test_from_config_without_defaults() {
        let mut config = RouterConfig {
            include_default_providers: false,
            ..RouterConfig::default()
        };
        config.providers.insert(
            "local/llama".to_string(),
            ProviderCapability::new("Llama", 8192).with_streaming(),
        );
        config.rules = Some(RoutingRules::new().with_rule(NeedsTools, ["local/llama-tools"]));

        let router = CapabilityRouter::from_config(&config);
        assert_eq!(router.registered_providers(), vec!["local/llama"]);

        let decision = router.route_request("local/llama", &[NeedsTools], true);
        assert_eq!(decision.selected_provider, "local/llama-tools");
        assert!(decision.fallback_used);
    }

    #[test]
    fn test_concurrent_register_and_route() {
        use std::sync::Arc;

        let router = Arc::new(CapabilityRouter::new());
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let router = Arc::clone(&router);
                std::thread::spawn(move || {
                    router.register_provider_capability(
                        format!("local/model-{}", n),
                        ProviderCapability::new("Local", 2048).with_streaming(),
                    );
                    router.route_request("openai/gpt-4o", &[NeedsVision], true)
                })
            })
            .collect();

        for handle in handles {
            assert!(!handle.join().unwrap().fallback_used);
        }
        assert_eq!(router.registered_providers().len(), 11);
    }
}
