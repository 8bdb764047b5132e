//! # Ask Command
//!
//! File: cli/src/commands/ask.rs
//!
//! ## Overview
//!
//! Answers a single question given on the command line and exits:
//!
//! ```bash
//! keyreply ask my program crashes all the time
//! ```
//!
//! The words are joined with spaces and tokenized exactly like a line typed
//! into `chat`, so both commands answer the same input the same way.
//!
use crate::commands::load_responder;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::input;
use clap::Parser;
use std::io::Write;
use tracing::info;

/// Arguments for `keyreply ask`.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The words of the question.
    #[arg(required = true, value_name = "WORDS")]
    pub words: Vec<String>,
}

/// Prints the response to `args.words`.
pub fn handle_ask(args: AskArgs, config: &Config) -> Result<()> {
    info!("Handling ask command with args: {:?}", args);
    let responder = load_responder(config).value;
    let words = input::tokenize(&args.words.join(" "));
    let response = responder.generate_response(&words);

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", response)?;
    Ok(())
}
