//! # Responder Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure components shared by the
//! responder and the command handlers:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the crate-wide `Result`
//!
//! ## Usage
//!
//! ```rust
//! use keyreply::core::config; // For loading configuration
//! use keyreply::core::error::{ResponderError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
