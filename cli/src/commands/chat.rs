//! # Chat Command
//!
//! File: cli/src/commands/chat.rs
//!
//! ## Overview
//!
//! Runs an interactive session: the user types a line, the responder answers,
//! until the quit word or end of input.
//!
//! ```text
//! Welcome to the keyword responder. Please tell me what is on your mind.
//! Type 'bye' to leave.
//! > my program is slow
//! Responder: I think this has to do with your hardware.
//! > bye
//! Responder: Nice talking to you. Bye...
//! ```
//!
//! `run_session` is generic over its input and output so the loop can be
//! driven by tests as well as by the terminal.
//!
use crate::commands::load_responder;
use crate::core::config::{ChatConfig, Config};
use crate::core::error::Result;
use crate::input;
use crate::responder::Responder;
use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

const PROMPT: &str = "> ";

/// Arguments for `keyreply chat`.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Do not print the greeting.
    #[arg(long, short)]
    pub quiet: bool,
}

/// Runs an interactive session on the terminal.
pub fn handle_chat(args: ChatArgs, config: &Config) -> Result<()> {
    info!("Handling chat command with args: {:?}", args);
    let responder = load_responder(config).value;

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(
        &responder,
        &config.chat,
        !args.quiet,
        stdin.lock(),
        stdout.lock(),
    )
}

/// Reads lines from `input` and answers each on `output`.
///
/// Ends when a line consists of the quit word alone (any case) or when
/// `input` is exhausted.
pub fn run_session<R: BufRead, W: Write>(
    responder: &Responder,
    chat: &ChatConfig,
    greet: bool,
    mut input: R,
    mut output: W,
) -> Result<()> {
    if greet {
        writeln!(output, "{}", chat.greeting)?;
    }

    let quit_word = chat.quit_word.trim();
    let mut buf = Vec::new();
    loop {
        write!(output, "{}", PROMPT)?;
        output.flush().context("Failed to flush output")?;

        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .context("Failed to read from input")?;
        if read == 0 {
            debug!("Input closed, ending chat session");
            writeln!(output)?;
            break;
        }

        // Invalid UTF-8 becomes U+FFFD and simply matches no keyword.
        let line = String::from_utf8_lossy(&buf);
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case(quit_word) {
            writeln!(output, "{}: {}", chat.bot_name, chat.farewell)?;
            break;
        }

        let response = responder.generate_response(&input::tokenize(trimmed));
        writeln!(output, "{}: {}", chat.bot_name, response)?;
    }
    Ok(())
}
