//! # Responder Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the `keyreply` CLI and
//! the setup routine they share.
//!
//! ## Commands
//!
//! - `chat`: Interactive session on stdin/stdout
//! - `ask`: One-shot response for words given on the command line
//! - `check`: Report problems in the response sources
//!
//! Each command defines its own arguments structure and handler function.
//! Handlers receive the effective `Config` loaded by `main.rs`.
//!
use crate::core::config::Config;
use crate::responder::{Loaded, Responder};
use tracing::info;

/// One-shot response for command-line words.
pub mod ask;
/// Interactive chat loop.
pub mod chat;
/// Source validation report.
pub mod check;

/// Builds the responder described by `config`.
///
/// Never fails; see `Responder::load`.
pub fn load_responder(config: &Config) -> Loaded<Responder> {
    let responses = config.responses_path();
    let defaults = config.defaults_path();
    info!(
        "Loading responses from '{}' and defaults from '{}'",
        responses.display(),
        defaults.display()
    );
    Responder::load(&responses, &defaults, &config.responder_options())
}
