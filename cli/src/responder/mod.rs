//! # Keyword Responder
//!
//! File: cli/src/responder/mod.rs
//!
//! ## Overview
//!
//! This module ties the loaders and the selector together into `Responder`,
//! the object collaborators talk to. A `Responder` is built once from two text
//! sources (a keyword-block table and a list of default responses) and then
//! answers any number of `generate_response` calls without changing its data.
//!
//! ## Architecture
//!
//! - `source`: line reading, `LoadIssue` and `Loaded<T>`.
//! - `table`: `ResponseTable` and its block parser.
//! - `defaults`: `DefaultResponses` and the built-in fallback.
//! - `selector`: first-match selection and default picking.
//!
//! Loading never fails. Problems with the sources are logged and returned as
//! `LoadIssue`s next to the responder, which still works with whatever could
//! be loaded.
//!
//! ## Examples
//!
//! ```rust
//! use keyreply::responder::{DefaultResponses, Responder, ResponderOptions, ResponseTable, TrailingBlock};
//! use std::collections::HashSet;
//! use std::io::Cursor;
//!
//! let table = ResponseTable::from_reader(
//!     Cursor::new("slow, sluggish\nThat depends on your hardware.\n\n"),
//!     "inline",
//!     TrailingBlock::Discard,
//! )
//! .value;
//! let responder = Responder::new(table, DefaultResponses::default(), &ResponderOptions::default());
//!
//! let words: HashSet<String> = ["it", "is", "slow"].iter().map(|w| w.to_string()).collect();
//! assert_eq!(responder.generate_response(&words), "That depends on your hardware.");
//! ```
//!
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

pub mod defaults;
pub mod selector;
pub mod source;
pub mod table;

pub use defaults::{DefaultResponses, FALLBACK_RESPONSE};
pub use source::{LoadIssue, Loaded};
pub use table::ResponseTable;

/// What to do with a block that is still open when its source ends.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TrailingBlock {
    /// Drop it. Matches the established file format, where every block ends
    /// with a blank line.
    #[default]
    Discard,
    /// Treat end of input as the terminating blank line.
    Flush,
}

/// Order in which input words are checked against the table.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WordOrder {
    /// Lexicographic byte order; the same input always selects the same keyword.
    #[default]
    Sorted,
    /// Whatever order the input set iterates in.
    AsGiven,
}

/// Settings that shape how a `Responder` loads and selects.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResponderOptions {
    pub trailing_block: TrailingBlock,
    pub word_order: WordOrder,
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

/// Keyword-driven response generator.
#[derive(Debug)]
pub struct Responder {
    table: ResponseTable,
    defaults: DefaultResponses,
    word_order: WordOrder,
    rng: Mutex<StdRng>,
}

impl Responder {
    /// Builds a responder from already-loaded data.
    pub fn new(table: ResponseTable, defaults: DefaultResponses, options: &ResponderOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            table,
            defaults,
            word_order: options.word_order,
            rng: Mutex::new(rng),
        }
    }

    /// Loads both sources and builds a responder.
    ///
    /// Issues from both sources are collected, table issues first.
    pub fn load(responses: &Path, defaults: &Path, options: &ResponderOptions) -> Loaded<Self> {
        let table = ResponseTable::load(responses, options.trailing_block);
        let defaults = DefaultResponses::load(defaults, options.trailing_block);
        let mut issues = table.issues;
        issues.extend(defaults.issues);
        info!(
            "Responder ready: {} keywords, {} default responses, {} load issues",
            table.value.len(),
            defaults.value.len(),
            issues.len()
        );
        Loaded {
            value: Self::new(table.value, defaults.value, options),
            issues,
        }
    }

    pub fn table(&self) -> &ResponseTable {
        &self.table
    }

    pub fn defaults(&self) -> &DefaultResponses {
        &self.defaults
    }

    /// Generates the response for a set of input words.
    ///
    /// Always returns a non-empty string.
    pub fn generate_response<S: std::hash::BuildHasher>(&self, words: &HashSet<String, S>) -> String {
        let ordered = selector::ordered_words(words, self.word_order);
        if let Some(response) = selector::find_match(&ordered, &self.table) {
            debug!("Matched a keyword among {:?}", ordered);
            return response.to_string();
        }
        debug!("No keyword among {:?}, picking a default response", ordered);
        // A poisoned lock still guards a usable RNG.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.defaults.pick(&mut *rng).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::thread;

    fn words(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn write_sources(dir: &Path, map: &str, defaults: &str) -> (std::path::PathBuf, std::path::PathBuf) {
        let map_path = dir.join("Response Map.txt");
        let defaults_path = dir.join("default.txt");
        fs::write(&map_path, map).unwrap();
        fs::write(&defaults_path, defaults).unwrap();
        (map_path, defaults_path)
    }

    #[test]
    fn loads_both_sources_and_answers() {
        let dir = tempfile::tempdir().unwrap();
        let (map, defaults) = write_sources(
            dir.path(),
            "crash, crashes\nWell, it never crashes on our system.\n\n",
            "Tell me more.\n\n",
        );
        let loaded = Responder::load(&map, &defaults, &ResponderOptions::default());
        assert!(loaded.is_clean());
        let responder = loaded.value;

        assert_eq!(
            responder.generate_response(&words(&["it", "crashes"])),
            "Well, it never crashes on our system."
        );
        assert_eq!(responder.generate_response(&words(&["hmm"])), "Tell me more.");
        assert_eq!(responder.generate_response(&words(&[])), "Tell me more.");
    }

    #[test]
    fn missing_sources_still_answer_with_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Responder::load(
            &dir.path().join("nope.txt"),
            &dir.path().join("also-nope.txt"),
            &ResponderOptions::default(),
        );
        assert_eq!(loaded.issues.len(), 2);
        assert!(loaded.value.table().is_empty());
        assert_eq!(
            loaded.value.generate_response(&words(&["anything"])),
            FALLBACK_RESPONSE
        );
    }

    #[test]
    fn sorted_order_is_stable_across_calls() {
        let dir = tempfile::tempdir().unwrap();
        let (map, defaults) = write_sources(dir.path(), "b\nB\n\na\nA\n\nc\nC\n\n", "d\n\n");
        let responder = Responder::load(&map, &defaults, &ResponderOptions::default()).value;
        for _ in 0..10 {
            assert_eq!(responder.generate_response(&words(&["c", "b", "a"])), "A");
        }
    }

    #[test]
    fn same_seed_gives_same_default_sequence() {
        let defaults = DefaultResponses::new((0..10).map(|i| format!("reply {}", i)).collect());
        let options = ResponderOptions {
            seed: Some(99),
            ..Default::default()
        };
        let first = Responder::new(ResponseTable::default(), defaults.clone(), &options);
        let second = Responder::new(ResponseTable::default(), defaults, &options);
        let input = words(&["unknown"]);
        for _ in 0..25 {
            assert_eq!(
                first.generate_response(&input),
                second.generate_response(&input)
            );
        }
    }

    #[test]
    fn shared_between_threads() {
        let defaults = DefaultResponses::new(vec!["one".into(), "two".into()]);
        let responder = Arc::new(Responder::new(
            ResponseTable::default(),
            defaults,
            &ResponderOptions::default(),
        ));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let responder = Arc::clone(&responder);
                thread::spawn(move || {
                    (0..100)
                        .map(|_| responder.generate_response(&HashSet::<String>::new()))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            for reply in handle.join().unwrap() {
                assert!(reply == "one" || reply == "two");
            }
        }
    }
}
