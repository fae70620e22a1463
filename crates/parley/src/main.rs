// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parley - a client-side conversational response orchestrator.
//!
//! This is the binary entry point. The interesting machinery lives in the
//! library crates; this binary loads config, initializes logging, and drives
//! the interactive shell.

mod shell;

use clap::{Parser, Subcommand};
use colored::Colorize;

/// Parley - a client-side conversational response orchestrator.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive chat shell.
    Shell,
    /// List configured providers and their failover order.
    Providers,
    /// Print the resolved configuration (credentials redacted).
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup; compiled defaults apply
    // when no config file exists.
    let config = match parley_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            parley_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.agent.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Some(Commands::Shell) => {
            if let Err(e) = shell::run(config).await {
                eprintln!("{} {e}", "error:".red());
                std::process::exit(1);
            }
        }
        Some(Commands::Providers) => print_providers(&config),
        Some(Commands::Config) => print_config(config),
        None => {
            println!("parley: use --help for available commands");
        }
    }
}

fn print_providers(config: &parley_config::ParleyConfig) {
    let registry = parley_config::ProviderRegistry::new(config.providers.clone());

    println!("{}", "configured providers (failover order):".bold());
    for provider in registry.enabled_ordered() {
        let key_state = if provider.api_key.is_some() {
            "key configured".green()
        } else {
            "no key".yellow()
        };
        println!(
            "  {:>3}  {:<12} {:<22} {}  {}",
            provider.priority,
            provider.id,
            provider.display_name,
            key_state,
            provider.description.dimmed()
        );
    }
    for provider in registry.list().into_iter().filter(|p| !p.enabled) {
        println!(
            "   --  {:<12} {:<22} {}",
            provider.id,
            provider.display_name,
            "disabled".dimmed()
        );
    }
}

fn print_config(mut config: parley_config::ParleyConfig) {
    for provider in &mut config.providers {
        if provider.api_key.is_some() {
            provider.api_key = Some("<redacted>".to_string());
        }
    }
    match toml::to_string_pretty(&config) {
        Ok(rendered) => print!("{rendered}"),
        Err(e) => eprintln!("failed to render config: {e}"),
    }
}
