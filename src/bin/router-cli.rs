use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use dispatch_router::config::load_config;
use dispatch_router::routing::{PathParams, RuleTable};

#[derive(Parser)]
#[command(name = "router-cli")]
#[command(about = "Inspect and test a dispatch router configuration offline", long_about = None)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short, long, default_value = "dispatch-router.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the config and list its rules in precedence order
    Check,
    /// Resolve a request against the configured rules
    Resolve {
        /// Request method, e.g. GET
        method: String,
        /// Request path, e.g. /users/42
        path: String,
    },
}

#[derive(Serialize)]
struct RuleSummary<'a> {
    name: &'a str,
    method: &'a str,
    pattern: String,
}

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum Resolution<'a> {
    Matched {
        route: &'a str,
        pattern: String,
        params: PathParams,
    },
    Failed {
        error: String,
        status: u16,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    // The handler slot carries the route name; nothing is executed.
    let mut table = RuleTable::new();
    for route in &config.routes {
        table.register(route.method.as_str(), &route.pattern, route.name.as_str())?;
    }

    match cli.command {
        Commands::Check => {
            let rules: Vec<RuleSummary> = table
                .rules()
                .iter()
                .map(|rule| RuleSummary {
                    name: rule.handler(),
                    method: rule.method(),
                    pattern: rule.pattern().to_string(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
        Commands::Resolve { method, path } => {
            let resolution = match table.resolve(&path, &method) {
                Ok(resolved) => Resolution::Matched {
                    route: resolved.handler(),
                    pattern: resolved.rule.pattern().to_string(),
                    params: resolved.params,
                },
                Err(e) => Resolution::Failed {
                    error: e.to_string(),
                    status: e.status_code().as_u16(),
                },
            };
            println!("{}", serde_json::to_string_pretty(&resolution)?);
        }
    }

    Ok(())
}
