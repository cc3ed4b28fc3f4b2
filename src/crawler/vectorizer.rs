//! Text vectorizer
//!
//! Turns extracted page text into a word-frequency map plus the total token
//! count. Tokenization is deliberately simple: lowercase, split on
//! non-alphanumeric characters. The rest of the engine only consumes the
//! resulting map, so the policy can be swapped without touching the index.

use std::collections::BTreeMap;

/// Vectorizes `text` into (word -> frequency, total token count).
pub fn vectorize(text: &str) -> (BTreeMap<String, u64>, u64) {
    let mut counts = BTreeMap::new();
    let mut length = 0u64;

    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        *counts.entry(token.to_lowercase()).or_insert(0) += 1;
        length += 1;
    }

    (counts, length)
}
