//! # keyreply
//!
//! File: cli/src/lib.rs
//!
//! ## Overview
//!
//! A keyword-driven response generator for teaching chatbots. Given the set
//! of words a user typed, it answers with the canned response of the first
//! known keyword, or with a randomly chosen default response when no word is
//! known.
//!
//! The library half of the crate holds everything the `keyreply` binary uses,
//! so integration tests and other programs can drive the responder directly.
//!
//! ## Architecture
//!
//! - `responder`: Source loading, the response table, default responses and
//!   the selection algorithm
//! - `input`: Tokenizing raw user text into a word set
//! - `core`: Configuration and error types
//! - `commands`: The `chat`, `ask` and `check` command handlers
//!
pub mod commands;
pub mod core;
pub mod input;
pub mod responder;
