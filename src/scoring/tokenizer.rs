//! Case-insensitive word tokenizer

use std::collections::HashMap;

/// Token multiset: lower-cased word to occurrence count
pub type TokenCounts = HashMap<String, u32>;

/// Split text into lower-cased word tokens and count them.
///
/// A word is a maximal run of alphanumeric characters or underscores.
pub fn tokenize(text: &str) -> TokenCounts {
    let mut counts = TokenCounts::new();
    for word in text
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
    {
        *counts.entry(word.to_lowercase()).or_insert(0) += 1;
    }
    counts
}

/// Cosine similarity between two token multisets; 0.0 if either is empty
pub fn cosine_similarity(a: &TokenCounts, b: &TokenCounts) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let dot: f64 = small
        .iter()
        .filter_map(|(token, &n)| large.get(token).map(|&m| f64::from(n) * f64::from(m)))
        .sum();

    let norm = |v: &TokenCounts| v.values().map(|&n| f64::from(n).powi(2)).sum::<f64>().sqrt();
    let denominator = norm(a) * norm(b);

    if denominator == 0.0 {
        return 0.0;
    }
    dot / denominator
}
