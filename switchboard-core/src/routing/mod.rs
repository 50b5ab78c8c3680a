//! Capability routing
//!
//! Infers what a request needs from its text and context flags, then picks
//! the provider that serves it. The requested provider is preferred; a
//! fallback is chosen from the rule table only when it falls short.
//!
//! ```
//! use switchboard_core::routing::{CapabilityRouter, RequestContext};
//! use switchboard_core::tools::{AgentCapability, CapabilitySet};
//!
//! let router = CapabilityRouter::new();
//! let agent = CapabilitySet::from_capabilities([AgentCapability::Basic]);
//! let ctx = RequestContext::new().with_image_input();
//!
//! let required = router.analyze_request("what is in this photo?", &agent, Some(&ctx));
//! let decision = router.route_request("openai/gpt-4-turbo", &required, true);
//!
//! assert!(decision.fallback_used);
//! assert_eq!(decision.selected_provider, "openai/gpt-4o");
//! assert!(decision.is_satisfied());
//! ```

mod analyzer;
mod capability;
mod provider;
mod router;
mod rules;

pub use analyzer::{CODE_GEN_PHRASES, IMAGE_GEN_PHRASES, analyze_request};
pub use capability::{RequestCapability, RequestContext};
pub use provider::{ProviderCapability, default_providers};
pub use router::{CapabilityRouter, RoutingDecision};
pub use rules::{Candidate, RoutingRules, WILDCARD};
