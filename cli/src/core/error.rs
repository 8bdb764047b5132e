//! # Responder Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error taxonomy used by the response loaders and the
//! crate-wide `Result` alias.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `ResponderError`: A custom error enum using `thiserror` for the specific
//!   conditions a loader can run into.
//! - `Result<T>`: A type alias for `anyhow::Result<T>`, used by configuration
//!   loading and command handlers where context matters more than the kind.
//!
//! The loader conditions (`SourceNotFound`, `SourceRead`, `NullKey`,
//! `EmptyResponse`) are never propagated to callers of
//! `Responder::generate_response`. The loaders log them and hand them back as
//! `LoadIssue`s next to whatever they managed to load.
//!
//! ## Examples
//!
//! ```rust
//! use keyreply::core::error::ResponderError;
//!
//! let err = ResponderError::EmptyResponse {
//!     line: 4,
//!     keys: "hello, hi".to_string(),
//! };
//! assert_eq!(
//!     err.to_string(),
//!     "Block at line 4 has no response for keys: hello, hi"
//! );
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the responder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponderError {
    #[error("Response source '{}' was not found", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Problem reading response source '{}' at line {line}: {reason}", path.display())]
    SourceRead {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Block at line {line} has an empty key paired with the response: {response}")]
    NullKey { line: usize, response: String },

    #[error("Block at line {line} has no response for keys: {keys}")]
    EmptyResponse { line: usize, keys: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
