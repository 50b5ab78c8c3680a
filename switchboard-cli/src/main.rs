//! Switchboard CLI - inspect request analysis, routing and agent presets

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use switchboard_core::prelude::*;

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(about = "Agent tool access and capability routing CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to switchboard.toml plus env overrides)
    #[arg(short, long, global = true, env = "SWITCHBOARD_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer the capabilities a request needs
    Analyze {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Decide which provider serves a request
    Route {
        /// Provider the caller asked for
        provider: String,

        #[command(flatten)]
        request: RequestArgs,

        /// Explicit capabilities instead of analyzing a message
        #[arg(short, long, value_delimiter = ',')]
        require: Vec<String>,

        /// Keep the requested provider even when it falls short
        #[arg(long)]
        no_fallback: bool,
    },
    /// List registered providers
    Providers,
    /// List configured agents, or the presets when none are configured
    Agents,
    /// Version information
    Version,
}

#[derive(Args)]
struct RequestArgs {
    /// Message text
    #[arg(short, long, default_value = "")]
    message: String,

    /// Capabilities of the requesting agent
    #[arg(short = 'a', long = "agent-capabilities", value_delimiter = ',', default_value = "basic")]
    agent_capabilities: Vec<String>,

    /// Request carries audio
    #[arg(long)]
    audio_in: bool,

    /// Caller expects spoken output
    #[arg(long)]
    audio_out: bool,

    /// Request carries an image
    #[arg(long)]
    image: bool,
}

impl RequestArgs {
    fn analyze(&self, router: &CapabilityRouter) -> Result<Vec<RequestCapability>> {
        let agent = CapabilitySet::parse(self.agent_capabilities.as_slice())?;
        let context = RequestContext {
            has_audio_input: self.audio_in,
            expects_audio_output: self.audio_out,
            has_image_input: self.image,
            attachment_count: None,
            message_length: Some(self.message.len()),
        };
        Ok(router.analyze_request(&self.message, &agent, Some(&context)))
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SwitchboardConfig> {
    let config = match path {
        Some(path) => SwitchboardConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SwitchboardConfig::load().context("loading configuration")?,
    };
    Ok(config)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("switchboard {}", env!("CARGO_PKG_VERSION"));
        println!("switchboard-core {}", switchboard_core::VERSION);
        return Ok(());
    }

    let config = load_config(cli.config.as_ref())?;
    let switchboard = Switchboard::from_config(&config)?;
    let router = switchboard.router();

    match cli.command {
        Commands::Analyze { request } => {
            let capabilities = request.analyze(router)?;
            if cli.json {
                print_json(&capabilities)?;
            } else {
                for cap in capabilities {
                    println!("{}", cap);
                }
            }
        }
        Commands::Route {
            provider,
            request,
            require,
            no_fallback,
        } => {
            let required = if require.is_empty() {
                request.analyze(router)?
            } else {
                require
                    .iter()
                    .map(|s| s.parse::<RequestCapability>())
                    .collect::<std::result::Result<Vec<_>, _>>()?
            };
            tracing::debug!(provider = %provider, required = ?required, "Routing from CLI");

            let fallback_allowed = !no_fallback && router.fallback_allowed();
            let decision = router.route_request(&provider, &required, fallback_allowed);
            if cli.json {
                print_json(&decision)?;
            } else {
                println!("selected: {}", decision.selected_provider);
                println!("fallback: {}", decision.fallback_used);
                println!("verified: {}", decision.is_satisfied());
                if let Some(original) = &decision.original_provider {
                    println!("original: {}", original);
                }
                println!("reason:   {}", decision.reason);
            }
        }
        Commands::Providers => {
            let providers: Vec<(String, ProviderCapability)> = router
                .registered_providers()
                .into_iter()
                .filter_map(|id| router.provider_capability(&id).map(|cap| (id, cap)))
                .collect();
            if cli.json {
                let map: std::collections::BTreeMap<_, _> = providers.into_iter().collect();
                print_json(&map)?;
            } else {
                for (id, cap) in providers {
                    println!("{:<24} {:<18} max_tokens={}", id, cap.name, cap.max_tokens);
                }
            }
        }
        Commands::Agents => {
            let mut agents = switchboard.agents().all_agents();
            if agents.is_empty() {
                agents = presets::default_agent_configs();
            }
            if cli.json {
                print_json(&agents)?;
            } else {
                for agent in agents {
                    let categories: Vec<&str> = agent
                        .allowed_tool_categories
                        .iter()
                        .map(|c| c.as_str())
                        .collect();
                    println!(
                        "{:<20} {} categories=[{}]",
                        agent.id,
                        agent.capabilities,
                        categories.join(", ")
                    );
                }
            }
        }
        Commands::Version => {}
    }

    Ok(())
}
