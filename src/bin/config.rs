//! Configuration CLI
//!
//! Shows, initializes and validates the builder configuration.

use std::path::Path;

use clap::{Parser, Subcommand};
use oas_fluent::FluentConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oas-fluent-config")]
#[command(about = "Manage oas-fluent configuration")]
struct Cli {
    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration
    Show {
        /// Output format (toml, json)
        #[arg(short, long, default_value = "toml")]
        format: String,
    },

    /// Write a default config file
    Init {
        #[arg(short, long, default_value = "oas-fluent.toml")]
        output: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Load every configured profile and check the default exists
    Validate,
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
    match cli.command {
        Commands::Show { format } => {
            let config = FluentConfig::load_from(cli.config.as_deref())?;
            println!("{}", render(&config, &format)?);
            Ok(())
        }

        Commands::Init { output, force } => {
            if Path::new(&output).exists() && !force {
                return Err(format!("{} already exists (use --force to overwrite)", output).into());
            }
            FluentConfig::default().save(&output)?;
            println!("✅ Wrote {}", output);
            Ok(())
        }

        Commands::Validate => {
            let config = FluentConfig::load_from(cli.config.as_deref())?;
            let registry = config.registry()?;
            println!("🔍 {} profiles loaded", registry.len());

            let profile = registry.get(&config.profiles.default)?;
            println!("✅ Default profile {} (version {})", profile.id(), profile.version());
            Ok(())
        }
    }
}

fn render(config: &FluentConfig, format: &str) -> Result<String, Box<dyn std::error::Error>> {
    match format {
        "toml" => Ok(toml::to_string_pretty(config)?),
        "json" => Ok(serde_json::to_string_pretty(config)?),
        other => Err(format!("Unknown format '{}' (expected toml or json)", other).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_defaults_to_toml() {
        let cli = Cli::try_parse_from(["oas-fluent-config", "show"]).unwrap();
        match cli.command {
            Commands::Show { format } => assert_eq!(format, "toml"),
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn test_render_selects_format() {
        let config = FluentConfig::default();
        let toml_out = render(&config, "toml").unwrap();
        let json_out = render(&config, "json").unwrap();
        assert!(toml_out.contains("[profiles]"));
        assert!(serde_json::from_str::<serde_json::Value>(&json_out).is_ok());
        assert!(render(&config, "yaml").is_err());
    }
}
