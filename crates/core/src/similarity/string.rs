//! Character-level string similarity
//!
//! All functions return a score in `[0, 1]` where 1 means identical.

use std::collections::HashMap;

/// Levenshtein edit distance (insert, delete, substitute all cost 1)
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.len() > b_chars.len() {
        return levenshtein_distance(b, a);
    }
    if a_chars.is_empty() {
        return b_chars.len();
    }

    let mut prev: Vec<usize> = (0..=a_chars.len()).collect();
    let mut curr = vec![0usize; a_chars.len() + 1];

    for (j, bc) in b_chars.iter().enumerate() {
        curr[0] = j + 1;
        for (i, ac) in a_chars.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[i + 1] = (prev[i + 1] + 1).min(curr[i] + 1).min(prev[i] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[a_chars.len()]
}

/// Edit distance normalised by the longer string's length
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / max_len as f64
}

/// Jaro similarity
///
/// Characters match when equal and no further apart than
/// `max(len) / 2 - 1`; half the out-of-order matches count as
/// transpositions.
pub fn jaro_similarity(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() && b_chars.is_empty() {
        return 1.0;
    }
    if a_chars.is_empty() || b_chars.is_empty() {
        return 0.0;
    }

    let window = (a_chars.len().max(b_chars.len()) / 2).saturating_sub(1);
    let mut a_matched = vec![false; a_chars.len()];
    let mut b_matched = vec![false; b_chars.len()];
    let mut matches = 0usize;

    for (i, ac) in a_chars.iter().enumerate() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(b_chars.len());
        for j in start..end {
            if !b_matched[j] && b_chars[j] == *ac {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let b_in_order = b_chars
        .iter()
        .zip(&b_matched)
        .filter_map(|(c, m)| m.then_some(c));
    let out_of_order = a_chars
        .iter()
        .zip(&a_matched)
        .filter_map(|(c, m)| m.then_some(c))
        .zip(b_in_order)
        .filter(|(x, y)| x != y)
        .count();

    let m = matches as f64;
    let t = (out_of_order / 2) as f64;
    (m / a_chars.len() as f64 + m / b_chars.len() as f64 + (m - t) / m) / 3.0
}

/// Jaro-Winkler similarity: Jaro plus a bonus of 0.1 per shared prefix
/// character, up to four characters
pub fn jaro_winkler_similarity(a: &str, b: &str) -> f64 {
    const SCALING_FACTOR: f64 = 0.1;
    const MAX_PREFIX: usize = 4;

    let jaro = jaro_similarity(a, b);
    let prefix = a
        .chars()
        .zip(b.chars())
        .take(MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();

    jaro + prefix as f64 * SCALING_FACTOR * (1.0 - jaro)
}

/// Character n-grams with `$` boundary padding
pub fn char_ngrams(s: &str, n: usize) -> Vec<String> {
    if s.is_empty() || n == 0 {
        return Vec::new();
    }
    let pad = "$".repeat(n - 1);
    let padded: Vec<char> = format!("{pad}{s}{pad}").chars().collect();
    padded.windows(n).map(|w| w.iter().collect()).collect()
}

/// Dice coefficient over character n-gram multisets
pub fn ngram_similarity(a: &str, b: &str, n: usize) -> f64 {
    let a_grams = char_ngrams(a, n);
    let b_grams = char_ngrams(b, n);

    if a_grams.is_empty() && b_grams.is_empty() {
        return 1.0;
    }
    if a_grams.is_empty() || b_grams.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for gram in &a_grams {
        *counts.entry(gram.as_str()).or_insert(0) += 1;
    }
    let mut shared = 0usize;
    for gram in &b_grams {
        if let Some(count) = counts.get_mut(gram.as_str()) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }

    2.0 * shared as f64 / (a_grams.len() + b_grams.len()) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert!((levenshtein_similarity("cat", "hat") - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(levenshtein_similarity("", ""), 1.0);
    }

    #[test]
    fn test_jaro() {
        assert!((jaro_similarity("hello", "hello") - 1.0).abs() < 1e-9);
        assert_eq!(jaro_similarity("abc", ""), 0.0);
        assert!(jaro_similarity("martha", "marhta") > 0.94);
        assert!(jaro_similarity("dwayne", "duane") > 0.82);
    }

    #[test]
    fn test_jaro_winkler_prefix_bonus() {
        let jaro = jaro_similarity("martha", "marhta");
        let jw = jaro_winkler_similarity("martha", "marhta");
        assert!(jw > jaro);
        assert!((jw - 0.9611).abs() < 1e-3);
    }

    #[test]
    fn test_ngrams() {
        let grams = char_ngrams("ab", 3);
        assert_eq!(grams, vec!["$$a", "$ab", "ab$", "b$$"]);
        assert_eq!(ngram_similarity("boston", "boston", 3), 1.0);
        assert!(ngram_similarity("boston", "bostn", 3) > 0.5);
        assert_eq!(ngram_similarity("abc", "xyz", 3), 0.0);
    }
}
