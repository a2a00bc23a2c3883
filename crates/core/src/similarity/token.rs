//! Token-set similarity

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::string::jaro_winkler_similarity;

static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Lower-cased word tokens of a value, in order of appearance
pub fn tokenize(s: &str) -> Vec<String> {
    TOKEN_REGEX
        .find_iter(s)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

fn token_set(s: &str) -> BTreeSet<String> {
    tokenize(s).into_iter().collect()
}

/// `|A ∩ B| / |A ∪ B|` over token sets
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let a = token_set(a);
    let b = token_set(b);
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let shared = a.intersection(&b).count();
    let union = a.len() + b.len() - shared;
    shared as f64 / union as f64
}

/// `|A ∩ B| / sqrt(|A| · |B|)` over token sets
pub fn cosine_similarity(a: &str, b: &str) -> f64 {
    let a = token_set(a);
    let b = token_set(b);
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(&b).count();
    shared as f64 / ((a.len() * b.len()) as f64).sqrt()
}

/// Jaccard over tokens where near-identical tokens count as shared
///
/// Each left token is greedily paired with the best unused right token whose
/// Jaro-Winkler similarity reaches `inner_threshold`. The summed pair
/// similarities replace the intersection size, and every paired token
/// shrinks the union by one.
pub fn hybrid_jaccard_similarity(a: &str, b: &str, inner_threshold: f64) -> f64 {
    let a: Vec<String> = token_set(a).into_iter().collect();
    let b: Vec<String> = token_set(b).into_iter().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut used = vec![false; b.len()];
    let mut shared = 0.0;
    let mut paired = 0usize;

    for token in &a {
        let mut best: Option<(usize, f64)> = None;
        for (j, candidate) in b.iter().enumerate() {
            if used[j] {
                continue;
            }
            let score = jaro_winkler_similarity(token, candidate);
            if score >= inner_threshold && best.is_none_or(|(_, s)| score > s) {
                best = Some((j, score));
            }
        }
        if let Some((j, score)) = best {
            used[j] = true;
            shared += score;
            paired += 1;
        }
    }

    shared / (a.len() + b.len() - paired) as f64
}
