//! Weather agent example
//!
//! Registers a weather tool, shows which preset agents can see it, invokes
//! it through the tools object and routes a follow-up request that carries
//! an image.

use serde_json::{Value, json};
use std::time::Instant;
use switchboard_core::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut config = SwitchboardConfig::default();
    config.agents.include_default_agents = true;
    let switchboard = Switchboard::from_config(&config)?;

    switchboard.registry().register_tool(
        ToolMetadata::new(
            "getWeather",
            "Weather Information",
            "Get current weather information for a US location",
            ToolCategory::Weather,
        )
        .with_capability(AgentCapability::Basic)
        .with_tag("forecast"),
        FnCallable::boxed(|args: Value, _ctx: &ToolExecutionContext| {
            let location = args
                .get("location")
                .and_then(Value::as_str)
                .ok_or_else(|| ToolError::validation("location is required"))?;
            Ok(json!({ "location": location, "temperature": 68, "conditions": "sunny" }))
        }),
        None,
    )?;

    for agent in switchboard.agents().all_agents() {
        let tools = switchboard.registry().get_available_tools_for_agent(&agent.id)?;
        let ids: Vec<&str> = tools.iter().map(|t| t.id()).collect();
        println!("{:<20} {:?}", agent.id, ids);
    }

    let agent = switchboard
        .agents()
        .agent_config("weather-specialist")
        .ok_or("weather-specialist not registered")?;
    let tools = switchboard.registry().get_tools_object_for_agent(&agent.id)?;
    let ctx = ToolExecutionContext::new(&agent.id, agent.capabilities.clone());

    let started = Instant::now();
    let result = tools["getWeather"]
        .call(json!({ "location": "Austin, TX" }), &ctx)
        .await;
    switchboard.registry().log_execution(
        ctx,
        "getWeather",
        result.is_ok(),
        started.elapsed(),
        result.as_ref().err().map(|e| e.to_string()),
    );
    match result {
        Ok(value) => println!("\ngetWeather -> {}", value),
        Err(e) => println!("\ngetWeather failed: {}", e),
    }

    let router = switchboard.router();
    let required = router.analyze_request(
        "What does the sky in this picture say about tomorrow?",
        &agent.capabilities,
        Some(&RequestContext::new().with_image_input()),
    );
    let decision = router.route("openai/gpt-4-turbo", &required);
    println!("\nrequired: {:?}", required);
    println!("routed to {} ({})", decision.selected_provider, decision.reason);

    println!("\n{} execution(s) logged", switchboard.recent_executions().len());
    Ok(())
}
