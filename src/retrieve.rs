//! Top-k chunk retrieval by cosine similarity.

use tracing::debug;

use crate::index::{cosine_similarity, TfIdfIndex};
use crate::models::Chunk;

/// Return the `k` chunks most similar to `query`, ordered by descending
/// similarity. Ties keep their original chunk order (the sort is stable).
/// Empty `chunks` or `k == 0` yields an empty result without error.
pub fn top_k(query: &str, chunks: &[Chunk], index: &TfIdfIndex, k: usize) -> Vec<Chunk> {
    if chunks.is_empty() || k == 0 {
        return Vec::new();
    }

    let query_vectors = index.transform(&[query]);
    let query_vector = &query_vectors[0];
    let texts: Vec<&str> = chunks.iter().map(|chunk| chunk.text.as_str()).collect();
    let chunk_vectors = index.transform(&texts);

    let mut scored: Vec<(f32, &Chunk)> = chunks
        .iter()
        .zip(chunk_vectors.iter())
        .map(|(chunk, vector)| (cosine_similarity(query_vector, vector), chunk))
        .collect();

    // Vec::sort_by is stable, so equal scores preserve chunk order.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);

    debug!(
        "retrieved {} chunks, best score {:.3}",
        scored.len(),
        scored.first().map(|(score, _)| *score).unwrap_or(0.0)
    );

    scored.into_iter().map(|(_, chunk)| chunk.clone()).collect()
}
