//! Overlapping word-window chunker.
//!
//! Splits document text into fixed-size word windows where consecutive
//! windows share `overlap` words. A new chunk starts every
//! `chunk_size - overlap` words, so for `n` words the chunk count is
//! `floor((n - 1) / (chunk_size - overlap)) + 1` (0 for empty text).
//!
//! Pure and deterministic; chunk text is the window's words re-joined with
//! single spaces.

use crate::models::Chunk;

/// Split text into overlapping word-window chunks.
///
/// The final chunk may span fewer than `chunk_size` words. Callers must
/// ensure `overlap < chunk_size` (config validation enforces this); the
/// degenerate parameter combinations return no chunks rather than looping.
pub fn split_into_chunks(text: &str, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    if chunk_size == 0 || overlap >= chunk_size {
        return Vec::new();
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let step = chunk_size - overlap;
    let mut chunks = Vec::new();

    for (index, start) in (0..words.len()).step_by(step).enumerate() {
        let end = (start + chunk_size).min(words.len());
        chunks.push(Chunk {
            index,
            text: words[start..end].join(" "),
        });
    }

    chunks
}
