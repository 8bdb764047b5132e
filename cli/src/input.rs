//! # Input Tokenizer
//!
//! File: cli/src/input.rs
//!
//! Turns a raw line typed by the user into the word set the responder works
//! on: trimmed, lowercased and split on whitespace. Punctuation is kept, so
//! `"crash?"` and `"crash"` are different words.
//!
use std::collections::HashSet;

/// Splits `line` into its set of lowercase words.
pub fn tokenize(line: &str) -> HashSet<String> {
    line.trim()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_splits() {
        let words = tokenize("  My Program CRASHES   often ");
        let expected: HashSet<String> = ["my", "program", "crashes", "often"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(words, expected);
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(tokenize("slow slow SLOW").len(), 1);
    }

    #[test]
    fn blank_line_is_empty_set() {
        assert!(tokenize("   \t ").is_empty());
    }
}
