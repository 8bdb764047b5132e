//! # Responder Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system, handling loading,
//! merging, validation, and access to configuration data. It supports a
//! multi-level configuration approach that combines defaults, user settings,
//! project-specific overrides and command-line flags.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags (`ConfigOverrides`)
//! 2. An explicit `--config <PATH>` file, or else a project-specific
//!    `.keyreply.toml` in the current directory or its ancestors (the search
//!    stops at a directory containing `.git`)
//! 3. User-specific `config.toml` in the platform config directory
//! 4. Default values defined in the code
//!
//! Source paths may use `~`, which is expanded after merging.
//!
//! ## Examples
//!
//! Configuration file format:
//!
//! ```toml
//! [sources]
//! responses = "Response Map.txt"
//! defaults = "default.txt"
//! trailing_block = "discard"
//!
//! [selection]
//! word_order = "sorted"
//! seed = 42          # or "random" to drop a seed set by the user config
//!
//! [chat]
//! bot_name = "Responder"
//! quit_word = "bye"
//! ```
//!
//! The configuration is loaded once per command execution and passed to the
//! command handlers.
//!
use crate::core::error::{ResponderError, Result};
use crate::responder::{ResponderOptions, TrailingBlock, WordOrder};
use anyhow::{anyhow, Context};
use clap::Args;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// The effective configuration, after every layer has been merged.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Config {
    pub sources: SourcesConfig,
    pub selection: SelectionConfig,
    pub chat: ChatConfig,
}

/// Where the response data comes from and how it is parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcesConfig {
    /// Keyword-block response file (can use ~).
    pub responses: String,
    /// Default response file (can use ~).
    pub defaults: String,
    /// Handling of a final block that is not followed by a blank line.
    pub trailing_block: TrailingBlock,
}

/// How a response is chosen.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SelectionConfig {
    /// Order in which input words are checked against the keywords.
    pub word_order: WordOrder,
    /// Fixed seed for default-response picks.
    pub seed: Option<u64>,
}

/// Text shown by the interactive `chat` command.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    pub bot_name: String,
    pub greeting: String,
    pub farewell: String,
    /// Typing this word on its own ends the session (case-insensitive).
    pub quit_word: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            responses: default_responses_path(),
            defaults: default_defaults_path(),
            trailing_block: TrailingBlock::default(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            greeting: default_greeting(),
            farewell: default_farewell(),
            quit_word: default_quit_word(),
        }
    }
}

/// One configuration file as written: every key is optional, and a key that
/// is present wins over lower layers even when it repeats a default.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
struct ConfigLayer {
    #[serde(default)]
    sources: SourcesLayer,
    #[serde(default)]
    selection: SelectionLayer,
    #[serde(default)]
    chat: ChatLayer,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct SourcesLayer {
    responses: Option<String>,
    defaults: Option<String>,
    trailing_block: Option<TrailingBlock>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct SelectionLayer {
    word_order: Option<WordOrder>,
    seed: Option<SeedSetting>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct ChatLayer {
    bot_name: Option<String>,
    greeting: Option<String>,
    farewell: Option<String>,
    quit_word: Option<String>,
}

/// `seed = 42` fixes the seed; `seed = "random"` clears one set by a lower layer.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(untagged)]
enum SeedSetting {
    Fixed(u64),
    Random(RandomSeed),
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum RandomSeed {
    Random,
}

impl SeedSetting {
    fn value(self) -> Option<u64> {
        match self {
            SeedSetting::Fixed(seed) => Some(seed),
            SeedSetting::Random(_) => None,
        }
    }
}

impl ConfigLayer {
    /// Stacks `upper` on top of `self`; keys set in `upper` win.
    fn merge(self, upper: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            sources: SourcesLayer {
                responses: upper.sources.responses.or(self.sources.responses),
                defaults: upper.sources.defaults.or(self.sources.defaults),
                trailing_block: upper.sources.trailing_block.or(self.sources.trailing_block),
            },
            selection: SelectionLayer {
                word_order: upper.selection.word_order.or(self.selection.word_order),
                seed: upper.selection.seed.or(self.selection.seed),
            },
            chat: ChatLayer {
                bot_name: upper.chat.bot_name.or(self.chat.bot_name),
                greeting: upper.chat.greeting.or(self.chat.greeting),
                farewell: upper.chat.farewell.or(self.chat.farewell),
                quit_word: upper.chat.quit_word.or(self.chat.quit_word),
            },
        }
    }

    /// Fills every key no layer set with its built-in default.
    fn resolve(self) -> Config {
        Config {
            sources: SourcesConfig {
                responses: self.sources.responses.unwrap_or_else(default_responses_path),
                defaults: self.sources.defaults.unwrap_or_else(default_defaults_path),
                trailing_block: self.sources.trailing_block.unwrap_or_default(),
            },
            selection: SelectionConfig {
                word_order: self.selection.word_order.unwrap_or_default(),
                seed: self.selection.seed.and_then(SeedSetting::value),
            },
            chat: ChatConfig {
                bot_name: self.chat.bot_name.unwrap_or_else(default_bot_name),
                greeting: self.chat.greeting.unwrap_or_else(default_greeting),
                farewell: self.chat.farewell.unwrap_or_else(default_farewell),
                quit_word: self.chat.quit_word.unwrap_or_else(default_quit_word),
            },
        }
    }
}

fn default_responses_path() -> String {
    "Response Map.txt".to_string()
}
fn default_defaults_path() -> String {
    "default.txt".to_string()
}
fn default_bot_name() -> String {
    "Responder".to_string()
}
fn default_greeting() -> String {
    "Welcome to the keyword responder. Please tell me what is on your mind.\n\
     Type 'bye' to leave."
        .to_string()
}
fn default_farewell() -> String {
    "Nice talking to you. Bye...".to_string()
}
fn default_quit_word() -> String {
    "bye".to_string()
}

/// Command-line flags that override configuration files.
///
/// Flattened into the top-level CLI; every flag is global so it can follow
/// the subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Read configuration from this file instead of searching for `.keyreply.toml`.
    #[arg(long, global = true, env = "KEYREPLY_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keyword-block response file.
    #[arg(long, global = true, value_name = "PATH")]
    pub responses: Option<PathBuf>,

    /// Default response file.
    #[arg(long, global = true, value_name = "PATH")]
    pub defaults: Option<PathBuf>,

    /// Seed for default-response picks, for reproducible sessions.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Order in which input words are checked against the keywords.
    #[arg(long, global = true, value_enum)]
    pub word_order: Option<WordOrder>,

    /// Keep a final block that is not followed by a blank line.
    #[arg(long, global = true)]
    pub flush_trailing: bool,
}

impl Config {
    /// Path of the keyword-block response file.
    pub fn responses_path(&self) -> PathBuf {
        PathBuf::from(&self.sources.responses)
    }

    /// Path of the default response file.
    pub fn defaults_path(&self) -> PathBuf {
        PathBuf::from(&self.sources.defaults)
    }

    /// The subset of settings the responder itself needs.
    pub fn responder_options(&self) -> ResponderOptions {
        ResponderOptions {
            trailing_block: self.sources.trailing_block,
            word_order: self.selection.word_order,
            seed: self.selection.seed,
        }
    }
}

const PROJECT_CONFIG_FILENAME: &str = ".keyreply.toml";

/// Loads, merges, expands and validates the effective configuration.
pub fn load_config(overrides: &ConfigOverrides) -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = match &overrides.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Some(load_config_from_path(path)?)
        }
        None => load_project_config()?,
    };
    let mut merged_config = merge_configs(user_config, project_config);
    apply_overrides(&mut merged_config, overrides);
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigLayer>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "KeyReply", "keyreply") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigLayer>> {
    if let Some(project_config_path) = find_project_config_path()? {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.keyreply.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path() -> Result<Option<PathBuf>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    Ok(find_config_upwards(&current_dir))
}

fn find_config_upwards(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Option<ConfigLayer>, project: Option<ConfigLayer>) -> Config {
    let mut merged = user.unwrap_or_default();
    if let Some(project) = project {
        merged = merged.merge(project);
    }
    merged.resolve()
}

fn apply_overrides(config: &mut Config, overrides: &ConfigOverrides) {
    if let Some(path) = &overrides.responses {
        config.sources.responses = path.to_string_lossy().into_owned();
    }
    if let Some(path) = &overrides.defaults {
        config.sources.defaults = path.to_string_lossy().into_owned();
    }
    if overrides.flush_trailing {
        config.sources.trailing_block = TrailingBlock::Flush;
    }
    if let Some(order) = overrides.word_order {
        config.selection.word_order = order;
    }
    if overrides.seed.is_some() {
        config.selection.seed = overrides.seed;
    }
}

fn expand_config_paths(config: &mut Config) {
    debug!("Expanding paths in configuration...");
    config.sources.responses = shellexpand::tilde(&config.sources.responses).into_owned();
    config.sources.defaults = shellexpand::tilde(&config.sources.defaults).into_owned();
    debug!(
        "Expanded source paths: {} / {}",
        config.sources.responses, config.sources.defaults
    );
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    let quit_word = config.chat.quit_word.trim();
    if quit_word.is_empty() {
        return Err(anyhow!(ResponderError::Config(
            "chat.quit_word must not be empty".to_string()
        )));
    }
    if quit_word.split_whitespace().count() != 1 {
        return Err(anyhow!(ResponderError::Config(format!(
            "chat.quit_word must be a single word, got '{}'",
            config.chat.quit_word
        ))));
    }
    if config.chat.bot_name.trim().is_empty() {
        return Err(anyhow!(ResponderError::Config(
            "chat.bot_name must not be empty".to_string()
        )));
    }
    for source in [config.responses_path(), config.defaults_path()] {
        if !source.exists() {
            warn!(
                "Configured response source '{}' does not exist.",
                source.display()
            );
        } else if source.is_dir() {
            warn!(
                "Configured response source '{}' is a directory and cannot be read.",
                source.display()
            );
        }
    }
    info!("Configuration validation successful.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn layer(toml_content: &str) -> ConfigLayer {
        toml::from_str(toml_content).expect("Failed to parse TOML")
    }

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [sources]
            responses = "~/bot/map.txt"
            trailing_block = "flush"

            [selection]
            word_order = "as-given"
            seed = 7

            [chat]
            bot_name = "Rusty"
        "#;

        let config = layer(toml_content).resolve();

        assert_eq!(config.sources.responses, "~/bot/map.txt"); // Not yet expanded
        assert_eq!(config.sources.defaults, default_defaults_path()); // Default
        assert_eq!(config.sources.trailing_block, TrailingBlock::Flush);
        assert_eq!(config.selection.word_order, WordOrder::AsGiven);
        assert_eq!(config.selection.seed, Some(7));
        assert_eq!(config.chat.bot_name, "Rusty");
        assert_eq!(config.chat.quit_word, "bye");
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = layer("").resolve();
        assert_eq!(config, Config::default());
        assert_eq!(config.responses_path(), PathBuf::from("Response Map.txt"));
        assert_eq!(config.defaults_path(), PathBuf::from("default.txt"));
        assert_eq!(config.responder_options(), ResponderOptions::default());
        assert_eq!(merge_configs(None, None), Config::default());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: std::result::Result<ConfigLayer, _> =
            toml::from_str("[sources]\nrespones = \"x\"\n");
        assert!(result.is_err());
        let result: std::result::Result<ConfigLayer, _> =
            toml::from_str("[selection]\nseed = \"sometimes\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_project_overrides_user() {
        let user = layer(
            r#"
            [sources]
            responses = "/user/map.txt"
            defaults = "/user/defaults.txt"

            [selection]
            seed = 1
        "#,
        );
        let project = layer(
            r#"
            [sources]
            responses = "project-map.txt"

            [selection]
            word_order = "as-given"
            seed = 2
        "#,
        );

        let merged = merge_configs(Some(user), Some(project));
        assert_eq!(merged.sources.responses, "project-map.txt");
        assert_eq!(merged.sources.defaults, "/user/defaults.txt"); // Project did not set it
        assert_eq!(merged.selection.word_order, WordOrder::AsGiven);
        assert_eq!(merged.selection.seed, Some(2));
    }

    #[test]
    fn test_project_value_equal_to_default_still_overrides_user() {
        let user = layer(
            r#"
            [sources]
            trailing_block = "flush"

            [selection]
            word_order = "as-given"
            seed = 5

            [chat]
            quit_word = "quit"
        "#,
        );
        let project = layer(
            r#"
            [sources]
            trailing_block = "discard"

            [selection]
            word_order = "sorted"
            seed = "random"

            [chat]
            quit_word = "bye"
        "#,
        );

        let merged = merge_configs(Some(user), Some(project));
        assert_eq!(merged.sources.trailing_block, TrailingBlock::Discard);
        assert_eq!(merged.selection.word_order, WordOrder::Sorted);
        assert_eq!(merged.selection.seed, None);
        assert_eq!(merged.chat.quit_word, "bye");
    }

    #[test]
    fn test_user_values_survive_an_empty_project_file() {
        let user = layer("[chat]\nbot_name = \"Mine\"\n[selection]\nseed = 9\n");
        let merged = merge_configs(Some(user), Some(layer("")));
        assert_eq!(merged.chat.bot_name, "Mine");
        assert_eq!(merged.selection.seed, Some(9));
    }

    #[test]
    fn test_flags_override_files() {
        let mut config = Config::default();
        let overrides = ConfigOverrides {
            responses: Some(PathBuf::from("cli-map.txt")),
            seed: Some(11),
            word_order: Some(WordOrder::AsGiven),
            flush_trailing: true,
            ..Default::default()
        };
        apply_overrides(&mut config, &overrides);
        assert_eq!(config.sources.responses, "cli-map.txt");
        assert_eq!(config.sources.defaults, "default.txt");
        assert_eq!(
            config.responder_options(),
            ResponderOptions {
                trailing_block: TrailingBlock::Flush,
                word_order: WordOrder::AsGiven,
                seed: Some(11),
            }
        );
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config {
            sources: SourcesConfig {
                responses: "~/bot/map.txt".to_string(),
                defaults: "/absolute/default.txt".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        expand_config_paths(&mut config);

        let home_dir = directories::BaseDirs::new().unwrap().home_dir().to_path_buf();
        assert_eq!(
            config.sources.responses,
            home_dir.join("bot/map.txt").to_string_lossy()
        );
        assert_eq!(config.sources.defaults, "/absolute/default.txt"); // Absolute path unchanged
    }

    #[test]
    fn test_project_config_found_in_ancestor() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();
        assert_eq!(
            find_config_upwards(&nested),
            Some(temp_dir.path().join(PROJECT_CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_project_config_search_stops_at_git() {
        let temp_dir = tempdir().unwrap();
        let repo = temp_dir.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();
        fs::write(temp_dir.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();
        assert_eq!(find_config_upwards(&repo), None);
    }

    #[test]
    fn test_load_config_from_path_reports_bad_toml() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "[selection\nseed = ").unwrap();
        let result = load_config_from_path(&path);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse TOML"));
    }

    #[test]
    fn test_validate_config_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_config_multi_word_quit() {
        let config = Config {
            chat: ChatConfig {
                quit_word: "good bye".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must be a single word"));
    }

    #[test]
    fn test_validate_config_empty_quit() {
        let config = Config {
            chat: ChatConfig {
                quit_word: "  ".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
