//! # Response Selection
//!
//! File: cli/src/responder/selector.rs
//!
//! ## Overview
//!
//! Picks the response for a set of input words: the first word (in the order
//! presented) that is a keyword decides the response; if none is, a default
//! response is drawn uniformly at random.
//!
//! These are free functions over borrowed data. The only mutable input is the
//! random number generator, so the same table and defaults can serve any
//! number of callers.
//!
use super::defaults::DefaultResponses;
use super::table::ResponseTable;
use super::WordOrder;
use rand::Rng;
use std::collections::HashSet;
use std::hash::BuildHasher;

/// Returns the response of the first word that is a keyword, if any.
pub fn find_match<'t, W>(words: W, table: &'t ResponseTable) -> Option<&'t str>
where
    W: IntoIterator,
    W::Item: AsRef<str>,
{
    words.into_iter().find_map(|word| table.get(word.as_ref()))
}

/// Returns the first keyword match, else a uniformly random default.
pub fn select<'t, W, R>(
    words: W,
    table: &'t ResponseTable,
    defaults: &'t DefaultResponses,
    rng: &mut R,
) -> &'t str
where
    W: IntoIterator,
    W::Item: AsRef<str>,
    R: Rng + ?Sized,
{
    match find_match(words, table) {
        Some(response) => response,
        None => defaults.pick(rng),
    }
}

/// Lays out the words of `words` in the scan order given by `order`.
pub fn ordered_words<S: BuildHasher>(words: &HashSet<String, S>, order: WordOrder) -> Vec<&str> {
    let mut ordered: Vec<&str> = words.iter().map(String::as_str).collect();
    if order == WordOrder::Sorted {
        ordered.sort_unstable();
    }
    ordered
}
