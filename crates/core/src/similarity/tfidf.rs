//! TF-IDF weighting over a small value corpus

use std::collections::{BTreeMap, HashMap};

use super::token::tokenize;

/// Document frequencies of word tokens across a set of values
///
/// Built once per feature pair from the merged values of both sides, so
/// tokens common to the whole key (e.g. "street") weigh less than rare
/// ones.
#[derive(Debug, Clone, Default)]
pub struct TfIdfCorpus {
    document_count: usize,
    document_frequency: HashMap<String, usize>,
}

impl TfIdfCorpus {
    /// Build a corpus; each item is one document
    pub fn from_documents<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut corpus = Self::default();
        for document in documents {
            corpus.add(document.as_ref());
        }
        corpus
    }

    fn add(&mut self, document: &str) {
        self.document_count += 1;
        let mut tokens = tokenize(document);
        tokens.sort();
        tokens.dedup();
        for token in tokens {
            *self.document_frequency.entry(token).or_insert(0) += 1;
        }
    }

    /// Number of documents in the corpus
    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// Smoothed inverse document frequency, always positive
    pub fn idf(&self, token: &str) -> f64 {
        let df = self.document_frequency.get(token).copied().unwrap_or(0);
        ((1 + self.document_count) as f64 / (1 + df) as f64).ln() + 1.0
    }

    /// TF-IDF weight vector of a value
    pub fn weights(&self, value: &str) -> BTreeMap<String, f64> {
        let tokens = tokenize(value);
        let total = tokens.len() as f64;
        let mut tf: BTreeMap<String, usize> = BTreeMap::new();
        for token in tokens {
            *tf.entry(token).or_insert(0) += 1;
        }
        tf.into_iter()
            .map(|(token, count)| {
                let weight = count as f64 / total * self.idf(&token);
                (token, weight)
            })
            .collect()
    }

    /// Weighted Jaccard: `Σ min(wa, wb) / Σ max(wa, wb)`
    pub fn weighted_jaccard(&self, a: &str, b: &str) -> f64 {
        let wa = self.weights(a);
        let wb = self.weights(b);
        if wa.is_empty() && wb.is_empty() {
            return 1.0;
        }

        let mut min_sum = 0.0;
        let mut max_sum = 0.0;
        for (token, x) in &wa {
            let y = wb.get(token).copied().unwrap_or(0.0);
            min_sum += x.min(y);
            max_sum += x.max(y);
        }
        for (token, y) in &wb {
            if !wa.contains_key(token) {
                max_sum += y;
            }
        }

        if max_sum == 0.0 { 0.0 } else { min_sum / max_sum }
    }

    /// Cosine of the two TF-IDF vectors
    pub fn cosine(&self, a: &str, b: &str) -> f64 {
        let wa = self.weights(a);
        let wb = self.weights(b);
        if wa.is_empty() && wb.is_empty() {
            return 1.0;
        }

        let dot: f64 = wa
            .iter()
            .filter_map(|(token, x)| wb.get(token).map(|y| x * y))
            .sum();
        let norm_a = wa.values().map(|x| x * x).sum::<f64>().sqrt();
        let norm_b = wb.values().map(|y| y * y).sum::<f64>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            (dot / (norm_a * norm_b)).min(1.0)
        }
    }
}
