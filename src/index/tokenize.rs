//! Whitespace tokenization for the suggestion index.
//!
//! The same tokenizer is applied to entry text at build time and to queries
//! at lookup time, so a query token can only ever be compared against tokens
//! produced the same way.

/// Split text into lowercase tokens on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|t| t.to_lowercase())
        .collect()
}
