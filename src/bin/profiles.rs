//! Profile Inspector CLI
//!
//! Lists dialect profiles, shows the keys a node type may carry, and runs
//! the same key check the builders run.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use oas_fluent::profile::FeatureGuard;
use oas_fluent::FluentConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oas-profiles")]
#[command(about = "Inspect OpenAPI dialect profiles")]
struct Cli {
    /// Extra directory of profile definitions
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every known profile
    List,

    /// Show the keys a node type accepts
    Keys {
        /// Node type, e.g. Tag or PathItem
        node: String,
        /// Profile id (defaults to the configured default)
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Check whether a key is legal on a node type
    Check {
        node: String,
        key: String,
        #[arg(short, long)]
        profile: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = FluentConfig::load_from(cli.config.as_deref())?;
    if let Some(dir) = cli.dir {
        config.profiles.search_paths.push(dir);
    }
    let registry = config.registry()?;

    match cli.command {
        Commands::List => {
            println!("📋 Profiles ({}):", registry.len());
            for profile in registry.profiles() {
                let marker = if profile.id() == config.profiles.default { " (default)" } else { "" };
                println!(
                    "  {} - version {}, {} node types{}",
                    profile.id(),
                    profile.version(),
                    profile.node_types().len(),
                    marker
                );
            }
            Ok(())
        }

        Commands::Keys { node, profile } => {
            let id = profile.unwrap_or_else(|| config.profiles.default.clone());
            let profile = registry.get(&id)?;
            let keys = profile.allowed_keys_for(&node);
            if keys.is_empty() {
                println!("⚠️  Profile {} has no rules for {}", id, node);
                return Ok(());
            }
            println!("{} under {}:", node, id);
            for key in keys {
                println!("  {}", key);
            }
            Ok(())
        }

        Commands::Check { node, key, profile } => {
            let id = profile.unwrap_or_else(|| config.profiles.default.clone());
            let guard = FeatureGuard::new(registry.get(&id)?);

            match guard.assert_allowed_key(&node, &key) {
                Ok(()) => {
                    println!("✅ {}.{} is allowed under {}", node, key, id);
                    Ok(())
                }
                Err(e) => {
                    println!("❌ {}", e);
                    if let Some(suggestion) = guard.suggest(&node, &key) {
                        println!("   did you mean '{}'?", suggestion);
                    }
                    std::process::exit(1);
                }
            }
        }
    }
}
