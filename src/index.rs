//! TF-IDF vectorizer and index.
//!
//! [`TfIdfIndex::fit`] learns a vocabulary and smoothed inverse document
//! frequencies from a chunk set; [`TfIdfIndex::transform`] maps arbitrary
//! texts into L2-normalized tf·idf vectors in that vocabulary space. One
//! index exists per loaded document and is immutable after fitting.
//!
//! Tokenization lowercases and keeps alphanumeric/underscore runs of at
//! least two characters.

use anyhow::{bail, Result};
use std::collections::HashMap;

use crate::models::Chunk;

/// A fitted term-frequency–inverse-document-frequency model.
#[derive(Debug, Clone)]
pub struct TfIdfIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfIdfIndex {
    /// Fit a model over the vocabulary of a chunk set.
    ///
    /// # Errors
    ///
    /// Fails when `chunks` is empty or yields no tokens (degenerate input
    /// with no extractable vocabulary).
    pub fn fit(chunks: &[Chunk]) -> Result<Self> {
        if chunks.is_empty() {
            bail!("cannot fit index over an empty chunk set");
        }

        let n_docs = chunks.len();
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();

        for chunk in chunks {
            let mut seen: Vec<usize> = Vec::new();
            for token in tokenize(&chunk.text) {
                let next_id = vocabulary.len();
                let term_id = *vocabulary.entry(token).or_insert(next_id);
                if term_id == doc_freq.len() {
                    doc_freq.push(0);
                }
                if !seen.contains(&term_id) {
                    seen.push(term_id);
                    doc_freq[term_id] += 1;
                }
            }
        }

        if vocabulary.is_empty() {
            bail!("chunk set has no extractable vocabulary");
        }

        // Smoothed idf: ln((1 + n) / (1 + df)) + 1, never zero or negative.
        let idf: Vec<f32> = doc_freq
            .iter()
            .map(|&df| (((1 + n_docs) as f32) / ((1 + df) as f32)).ln() + 1.0)
            .collect();

        Ok(Self { vocabulary, idf })
    }

    /// Number of distinct terms in the fitted vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Produce one L2-normalized tf·idf vector per input text.
    ///
    /// Terms outside the fitted vocabulary are ignored; a text with no
    /// in-vocabulary terms maps to the zero vector.
    pub fn transform(&self, texts: &[&str]) -> Vec<Vec<f32>> {
        texts.iter().map(|text| self.transform_one(text)).collect()
    }

    fn transform_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.vocabulary.len()];
        for token in tokenize(text) {
            if let Some(&term_id) = self.vocabulary.get(&token) {
                vector[term_id] += 1.0;
            }
        }

        for (term_id, value) in vector.iter_mut().enumerate() {
            *value *= self.idf[term_id];
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in vector.iter_mut() {
                *value /= norm;
            }
        }

        vector
    }
}

/// Lowercased alphanumeric/underscore tokens of length >= 2.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|token| token.chars().count() >= 2)
        .map(|token| token.to_string())
        .collect()
}

/// Cosine similarity of two vectors; 0.0 for mismatched or zero-norm input.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| Chunk {
                index,
                text: text.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_fit_empty_chunk_set_fails() {
        assert!(TfIdfIndex::fit(&[]).is_err());
    }

    #[test]
    fn test_fit_degenerate_vocabulary_fails() {
        // Punctuation and single characters never tokenize.
        let err = TfIdfIndex::fit(&chunks(&["... !!! ?", "a b c"])).unwrap_err();
        assert!(err.to_string().contains("vocabulary"));
    }

    #[test]
    fn test_tokenize_lowercases_and_drops_short_tokens() {
        assert_eq!(
            tokenize("The quick-BROWN fox, v2 a!"),
            vec!["the", "quick", "brown", "fox", "v2"]
        );
    }

    #[test]
    fn test_transform_dimensions_match_vocabulary() {
        let index = TfIdfIndex::fit(&chunks(&["alpha beta", "beta gamma delta"])).unwrap();
        assert_eq!(index.vocabulary_size(), 4);
        let vectors = index.transform(&["alpha", "nothing known"]);
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].len(), 4);
        assert_eq!(vectors[1].len(), 4);
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let index = TfIdfIndex::fit(&chunks(&["alpha beta gamma", "beta gamma"])).unwrap();
        let vectors = index.transform(&["alpha beta beta gamma"]);
        let norm: f32 = vectors[0].iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_out_of_vocabulary_text_maps_to_zero_vector() {
        let index = TfIdfIndex::fit(&chunks(&["alpha beta"])).unwrap();
        let vectors = index.transform(&["unrelated words entirely"]);
        assert!(vectors[0].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_identical_texts_have_maximum_similarity() {
        let index = TfIdfIndex::fit(&chunks(&[
            "rust ownership borrowing",
            "python garbage collection",
        ]))
        .unwrap();
        let vectors = index.transform(&[
            "rust ownership borrowing",
            "rust ownership borrowing",
            "python garbage collection",
        ]);
        let same = cosine_similarity(&vectors[0], &vectors[1]);
        let different = cosine_similarity(&vectors[0], &vectors[2]);
        assert!((same - 1.0).abs() < 1e-5);
        assert!(different < same);
    }

    #[test]
    fn test_rare_terms_weigh_more_than_common_terms() {
        // "shared" appears in every chunk, "unique" in one.
        let index = TfIdfIndex::fit(&chunks(&[
            "shared unique",
            "shared filler",
            "shared other",
        ]))
        .unwrap();
        let vectors = index.transform(&["shared unique"]);
        let shared_id = *index.vocabulary.get("shared").unwrap();
        let unique_id = *index.vocabulary.get("unique").unwrap();
        assert!(vectors[0][unique_id] > vectors[0][shared_id]);
    }

    #[test]
    fn test_cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 2.0], &[1.0, 2.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }
}
