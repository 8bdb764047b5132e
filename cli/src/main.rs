//! # keyreply Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the `keyreply` CLI.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading the effective configuration
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Chat using the sources in the current directory
//! keyreply chat
//!
//! # One-shot answer with explicit sources and a fixed seed
//! keyreply --responses map.txt --defaults default.txt --seed 7 ask is it free
//!
//! # Report malformed blocks, with info-level logging
//! keyreply -v check
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Load configuration (files + flags)
//! 4. Route to the command handler
//! 5. Format and display any errors that occur
//!
use clap::Parser;
use keyreply::commands;
use keyreply::core::config::{self, ConfigOverrides};
use keyreply::core::error::Result;
use tracing_subscriber::{fmt, EnvFilter};

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "keyreply",
    about = "Keyword-driven canned response generator",
    long_about = "Answers user input with canned responses keyed on the words it contains,\n\
                  falling back to a random default response when no keyword matches.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(flatten)]
    overrides: ConfigOverrides,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Chat interactively on the terminal.
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    /// Print the response to the given words.
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    /// Report problems in the response sources.
    Check(commands::check::CheckArgs),
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(&cli.overrides)?;
    match cli.command {
        Commands::Chat(args) => commands::chat::handle_chat(args, &config),
        Commands::Ask(args) => commands::ask::handle_ask(args, &config),
        Commands::Check(args) => commands::check::handle_check(args, &config),
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = run(cli) {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
