//! # keyreply CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! This module provides shared utility functions used across the integration
//! test files (`ask.rs`, `chat.rs`, `check.rs`, ...). Each `.rs` file in
//! `cli/tests/` is compiled as a separate test crate, so helpers live here.
//!

// Allow potentially unused code in this common module, as different test files might use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Keyword-block source used by most tests.
pub const RESPONSE_MAP: &str = "\
slow, slowly
I think this has to do with your hardware.
Upgrading your processor should solve all performance problems.

crash, crashes
Well, it never crashes on our system.

free
The program is free of charge.

";

/// Default responses used by most tests.
pub const DEFAULTS: &str = "\
That sounds odd. Could you describe that problem in more detail?

No other customer has ever complained about this before.

";

/// # Get keyreply Command (`keyreply_cmd`)
///
/// Helper function to create an `assert_cmd::Command` instance pointing to the
/// compiled `keyreply` binary target for the current test run.
///
/// ## Panics
/// Panics if the `keyreply` binary cannot be found via `Command::cargo_bin`.
pub fn keyreply_cmd() -> Command {
    Command::cargo_bin("keyreply").expect("Failed to find keyreply binary for testing")
}

/// A temporary directory holding a response map, a defaults file and an empty
/// configuration file.
pub struct SourceDir {
    dir: TempDir,
}

impl SourceDir {
    /// Creates the directory with the given source contents.
    pub fn new(map: &str, defaults: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir for sources");
        fs::write(dir.path().join("Response Map.txt"), map).expect("Failed to write map");
        fs::write(dir.path().join("default.txt"), defaults).expect("Failed to write defaults");
        fs::write(dir.path().join("keyreply.toml"), "").expect("Failed to write config");
        Self { dir }
    }

    /// Creates the directory with the shared test sources.
    pub fn standard() -> Self {
        Self::new(RESPONSE_MAP, DEFAULTS)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// A `keyreply` command running inside the directory with the explicit
    /// (empty) config file. `HOME` and `XDG_CONFIG_HOME` point into the
    /// directory too, so neither project nor user configuration leaks in.
    pub fn cmd(&self) -> Command {
        let mut cmd = keyreply_cmd();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.file(".config"))
            .env("KEYREPLY_CONFIG", self.file("keyreply.toml"))
            .env_remove("RUST_LOG");
        cmd
    }

    /// Where `cmd()` looks for the user configuration on Linux.
    pub fn user_config(&self) -> PathBuf {
        self.file(".config").join("keyreply").join("config.toml")
    }
}
