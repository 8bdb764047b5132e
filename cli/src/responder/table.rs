//! # Response Table Loader
//!
//! File: cli/src/responder/table.rs
//!
//! ## Overview
//!
//! Parses the keyword-block source format into a `ResponseTable`:
//!
//! ```text
//! hello, hi
//! Hello there.
//! What can I do for you?
//!
//! slow
//! Have you tried turning it off and on again?
//!
//! ```
//!
//! The first non-blank line of a block is its header: keywords separated by
//! the literal `", "`. Every following line up to a blank line is body text;
//! each body line is trimmed and appended to the response without a separator.
//!
//! ## Architecture
//!
//! `TableParser` is a two-state machine (`AwaitingHeader`,
//! `AccumulatingBody`) with an explicit flush. A flush runs `validate_block`,
//! which returns a `ResponderError` for a block with an empty key or an empty
//! response. The parser records the error and skips the block; valid blocks
//! before and after it are unaffected.
//!
//! A block still open at end of input is handled according to
//! `TrailingBlock`. Read failures close the source early and are handled the
//! same way as end of input.
//!
use super::source::{self, LoadIssue, Loaded, SourceLines};
use super::TrailingBlock;
use crate::core::error::ResponderError;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// Separator between keywords on a header line.
pub const KEY_SEPARATOR: &str = ", ";

/// Mapping from keyword to canned response.
///
/// Keys are case-sensitive. Every key and every response is non-empty.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResponseTable {
    entries: HashMap<String, String>,
}

impl ResponseTable {
    /// Looks up the response for `keyword`.
    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.entries.get(keyword).map(String::as_str)
    }

    pub fn contains_key(&self, keyword: &str) -> bool {
        self.entries.contains_key(keyword)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the keywords in no particular order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn insert(&mut self, keyword: String, response: String) -> Option<String> {
        self.entries.insert(keyword, response)
    }

    /// Loads the table from the file at `path`.
    ///
    /// Never fails: a missing or unreadable file yields an empty (or partial)
    /// table and a `LoadIssue` describing why.
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

    /// Loads the table from an already-open reader. `origin` names the source
    /// in diagnostics.
    pub fn from_reader<R: BufRead>(
        reader: R,
        origin: impl Into<PathBuf>,
        trailing: TrailingBlock,
    ) -> Loaded<Self> {
        Self::parse(SourceLines::new(reader, origin), trailing)
    }

    fn parse<R: BufRead>(lines: SourceLines<R>, trailing: TrailingBlock) -> Loaded<Self> {
        let origin = lines.origin().to_path_buf();
        let mut parser = TableParser::new();
        let failure = source::drive(lines, |number, line| parser.feed(number, line));
        if let Some(error) = failure {
            warn!("{}", error);
            parser.errors.push(error);
        }
        let (table, errors) = parser.finish(trailing);
        info!(
            "Loaded {} keywords from {}",
            table.len(),
            origin.display()
        );
        Loaded {
            value: table,
            issues: errors
                .into_iter()
                .map(|error| LoadIssue {
                    origin: origin.clone(),
                    error,
                })
                .collect(),
        }
    }
}

enum ParseState {
    AwaitingHeader,
    AccumulatingBody {
        keys: Vec<String>,
        response: String,
        header_line: usize,
    },
}

struct TableParser {
    state: ParseState,
    table: ResponseTable,
    errors: Vec<ResponderError>,
}

impl TableParser {
    fn new() -> Self {
        Self {
            state: ParseState::AwaitingHeader,
            table: ResponseTable::default(),
            errors: Vec::new(),
        }
    }

    fn feed(&mut self, number: usize, line: &str) {
        let blank = line.trim().is_empty();
        match self.state {
            ParseState::AwaitingHeader if blank => {
                trace!("Skipping blank line {} between blocks", number);
            }
            ParseState::AwaitingHeader => {
                let keys = split_keys(line);
                trace!("Header at line {}: {:?}", number, keys);
                self.state = ParseState::AccumulatingBody {
                    keys,
                    response: String::new(),
                    header_line: number,
                };
            }
            ParseState::AccumulatingBody { .. } if blank => self.flush(),
            ParseState::AccumulatingBody {
                ref mut response, ..
            } => {
                response.push_str(line.replace('\n', " ").trim());
            }
        }
    }

    fn flush(&mut self) {
        let state = std::mem::replace(&mut self.state, ParseState::AwaitingHeader);
        let ParseState::AccumulatingBody {
            keys,
            response,
            header_line,
        } = state
        else {
            return;
        };

        if let Err(error) = validate_block(&keys, &response, header_line) {
            warn!("Skipping block: {}", error);
            self.errors.push(error);
            return;
        }
        for key in keys {
            if self.table.insert(key.clone(), response.clone()).is_some() {
                debug!(
                    "Keyword '{}' redefined at line {}, later response wins",
                    key, header_line
                );
            }
        }
    }

    fn finish(mut self, trailing: TrailingBlock) -> (ResponseTable, Vec<ResponderError>) {
        let pending = match &self.state {
            ParseState::AccumulatingBody {
                keys, header_line, ..
            } => Some((keys.join(KEY_SEPARATOR), *header_line)),
            ParseState::AwaitingHeader => None,
        };
        if let Some((keys, header_line)) = pending {
            match trailing {
                TrailingBlock::Discard => warn!(
                    "Discarding block at line {} ({}) because it is not followed by a blank line",
                    header_line, keys
                ),
                TrailingBlock::Flush => {
                    debug!("Flushing unterminated block at line {}", header_line);
                    self.flush();
                }
            }
        }
        (self.table, self.errors)
    }
}

/// Splits a header line into keywords.
///
/// Trailing empty tokens are dropped (`"a, b, "` gives `a` and `b`), other
/// empty tokens are kept so validation can reject them.
fn split_keys(header: &str) -> Vec<String> {
    let mut keys: Vec<String> = header.split(KEY_SEPARATOR).map(str::to_string).collect();
    while keys.len() > 1 && keys.last().is_some_and(|k| k.is_empty()) {
        keys.pop();
    }
    keys
}

/// Checks a finished block before any of its keys reach the table.
fn validate_block(keys: &[String], response: &str, line: usize) -> Result<(), ResponderError> {
    if keys.iter().any(|k| k.trim().is_empty()) {
        return Err(ResponderError::NullKey {
            line,
            response: response.to_string(),
        });
    }
    if response.is_empty() {
        return Err(ResponderError::EmptyResponse {
            line,
            keys: keys.join(KEY_SEPARATOR),
        });
    }
    Ok(())
}
