//! # Check Command
//!
//! File: cli/src/commands/check.rs
//!
//! ## Overview
//!
//! Loads both response sources the same way `chat` does and reports every
//! problem the loaders ran into, followed by a summary. Where `chat` and
//! `ask` quietly work around malformed data, `check` makes it visible and
//! exits with a failure status if anything was found.
//!
//! ```text
//! Response Map.txt: Block at line 12 has no response for keys: slow
//! Checked 'Response Map.txt' and 'default.txt': 23 keywords, 7 default responses, 1 problem
//! ```
//!
use crate::commands::load_responder;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::responder::{LoadIssue, Responder};
use clap::Parser;
use std::io::Write;
use tracing::info;

/// Arguments for `keyreply check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// List every keyword that was loaded.
    #[arg(long)]
    pub list: bool,
}

/// Loads the configured sources and reports their problems.
///
/// # Errors
///
/// Fails if any problem was found, so the exit status can be used in scripts.
pub fn handle_check(args: CheckArgs, config: &Config) -> Result<()> {
    info!("Handling check command with args: {:?}", args);
    let loaded = load_responder(config);

    let mut stdout = std::io::stdout().lock();
    write_report(&mut stdout, config, &loaded.value, &loaded.issues, args.list)?;

    if !loaded.is_clean() {
        anyhow::bail!(
            "{} found in the response sources",
            plural(loaded.issues.len(), "problem")
        );
    }
    Ok(())
}

fn write_report<W: Write>(
    out: &mut W,
    config: &Config,
    responder: &Responder,
    issues: &[LoadIssue],
    list: bool,
) -> Result<()> {
    for issue in issues {
        writeln!(out, "{}", issue)?;
    }
    if list {
        let mut keywords: Vec<&str> = responder.table().keywords().collect();
        keywords.sort_unstable();
        for keyword in keywords {
            writeln!(out, "  {}", keyword)?;
        }
    }
    let defaults = responder.defaults();
    writeln!(
        out,
        "Checked '{}' and '{}': {}, {}{}, {}",
        config.responses_path().display(),
        config.defaults_path().display(),
        plural(responder.table().len(), "keyword"),
        plural(defaults.len(), "default response"),
        if defaults.is_fallback() { " (built-in fallback)" } else { "" },
        plural(issues.len(), "problem"),
    )?;
    Ok(())
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
