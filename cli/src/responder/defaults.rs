//! # Default Response Loader
//!
//! File: cli/src/responder/defaults.rs
//!
//! ## Overview
//!
//! Loads the fallback responses used when no input word is a known keyword.
//! The source is a flat list of groups separated by empty lines; each group's
//! lines are joined verbatim into one response.
//!
//! Unlike the keyword table, a separator here must be exactly empty: a line of
//! spaces is body text. The resulting list is never empty; when the source
//! yields nothing, `FALLBACK_RESPONSE` is used.
//!
use super::source::{self, LoadIssue, Loaded, SourceLines};
use super::TrailingBlock;
use crate::core::error::ResponderError;
use rand::Rng;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The response used when the default source yields no entries.
pub const FALLBACK_RESPONSE: &str = "Could you elaborate on that?";

/// Ordered, non-empty list of fallback responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultResponses {
    responses: Vec<String>,
    fallback: bool,
}

impl Default for DefaultResponses {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl DefaultResponses {
    /// Builds the list, inserting `FALLBACK_RESPONSE` if `responses` is empty.
    pub fn new(responses: Vec<String>) -> Self {
        if responses.is_empty() {
            debug!("No default responses available, using the built-in fallback");
            return Self {
                responses: vec![FALLBACK_RESPONSE.to_string()],
                fallback: true,
            };
        }
        Self {
            responses,
            fallback: false,
        }
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Never `true`: the list always holds at least one response.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.responses
    }

    /// `true` if the list holds only the built-in fallback.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Picks one response uniformly at random.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        let index = rng.gen_range(0..self.responses.len());
        &self.responses[index]
    }

    /// Loads the list from the file at `path`.
    ///
    /// Never fails: a missing or unreadable source falls back to
    /// `FALLBACK_RESPONSE` and reports a `LoadIssue`.
    pub fn load(path: &Path, trailing: TrailingBlock) -> Loaded<Self> {
        match source::open(path) {
            Ok(lines) => Self::parse(lines, trailing),
            Err(error) => {
                warn!("{}", error);
                Loaded {
                    value: Self::default(),
                    issues: vec![LoadIssue {
                        origin: path.to_path_buf(),
                        error,
                    }],
                }
            }
        }
    }

    /// Loads the list from an already-open reader.
    pub fn from_reader<R: BufRead>(
        reader: R,
        origin: impl Into<PathBuf>,
        trailing: TrailingBlock,
    ) -> Loaded<Self> {
        Self::parse(SourceLines::new(reader, origin), trailing)
    }

    fn parse<R: BufRead>(lines: SourceLines<R>, trailing: TrailingBlock) -> Loaded<Self> {
        let origin = lines.origin().to_path_buf();
        let mut pending = String::new();
        let mut responses = Vec::new();

        let failure: Option<ResponderError> = source::drive(lines, |number, line| {
            if line.is_empty() {
                if pending.is_empty() {
                    debug!("Ignoring empty default response ending at line {}", number);
                } else {
                    responses.push(std::mem::take(&mut pending));
                }
            } else {
                pending.push_str(&line.replace('\n', " "));
            }
        });

        let mut issues = Vec::new();
        if let Some(error) = failure {
            warn!("{}", error);
            issues.push(LoadIssue {
                origin: origin.clone(),
                error,
            });
        }

        if !pending.is_empty() {
            match trailing {
                TrailingBlock::Discard => warn!(
                    "Discarding last default response in {} because it is not followed by a blank line",
                    origin.display()
                ),
                TrailingBlock::Flush => responses.push(pending),
            }
        }

        info!(
            "Loaded {} default responses from {}",
            responses.len(),
            origin.display()
        );
        Loaded {
            value: Self::new(responses),
            issues,
        }
    }
}
