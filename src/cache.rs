//! Content-addressed on-disk chunk cache.
//!
//! Processed chunk sequences are persisted under the MD5 hex digest of the
//! original document bytes, so re-uploading identical bytes skips extraction
//! and chunking entirely. Entries are never invalidated or evicted.
//!
//! Failure policy: any I/O or processing error is caught, logged, and
//! surfaced as an empty chunk sequence — callers treat the empty case as
//! "no context available".

use std::path::PathBuf;

use anyhow::{Context, Result};
use md5::{Digest, Md5};
use tracing::{debug, error, info};

use crate::chunk::split_into_chunks;
use crate::config::Config;
use crate::extract;
use crate::models::Chunk;

/// MD5 hex digest identifying a document's bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Path of the cache entry for a given content hash.
pub fn cache_path(config: &Config, hash: &str) -> PathBuf {
    config.cache.dir.join(format!("{hash}_chunks.json"))
}

/// Return the chunk sequence for a document, reusing the cache when the
/// same bytes have been processed before. Never fails: errors degrade to
/// an empty chunk sequence.
pub async fn get_or_create(config: &Config, bytes: &[u8]) -> Vec<Chunk> {
    match get_or_create_inner(config, bytes).await {
        Ok(chunks) => chunks,
        Err(e) => {
            error!("failed to process document chunks: {e:#}");
            Vec::new()
        }
    }
}

async fn get_or_create_inner(config: &Config, bytes: &[u8]) -> Result<Vec<Chunk>> {
    let hash = content_hash(bytes);
    let path = cache_path(config, &hash);

    if path.exists() {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry: {}", path.display()))?;
        let chunks: Vec<Chunk> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cache entry: {}", path.display()))?;
        debug!(%hash, "cache hit: {} chunks", chunks.len());
        return Ok(chunks);
    }

    let text = extract::extract_text(bytes, config.extraction.max_workers).await;
    let chunks = split_into_chunks(&text, config.chunking.chunk_size, config.chunking.overlap);

    std::fs::create_dir_all(&config.cache.dir).with_context(|| {
        format!(
            "Failed to create cache directory: {}",
            config.cache.dir.display()
        )
    })?;
    let serialized = serde_json::to_string(&chunks)?;
    std::fs::write(&path, serialized)
        .with_context(|| format!("Failed to write cache entry: {}", path.display()))?;

    info!(%hash, "cached {} chunks", chunks.len());
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.cache.dir = dir.path().join("cache");
        config
    }

    #[test]
    fn test_content_hash_is_md5_hex() {
        // Known digest: md5("hello") = 5d41402abc4b2a76b9719d911017c592
        assert_eq!(content_hash(b"hello"), "5d41402abc4b2a76b9719d911017c592");
        assert_eq!(content_hash(b""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_identical_bytes_share_a_cache_path() {
        let config = Config::default();
        let a = cache_path(&config, &content_hash(b"same bytes"));
        let b = cache_path(&config, &content_hash(b"same bytes"));
        assert_eq!(a, b);
        let c = cache_path(&config, &content_hash(b"other bytes"));
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_unparseable_document_yields_empty_and_is_cached() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);

        let chunks = get_or_create(&config, b"not a pdf").await;
        assert!(chunks.is_empty());

        // The (empty) result is still content-addressed on disk.
        let path = cache_path(&config, &content_hash(b"not a pdf"));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_reprocessing() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);

        let bytes = b"still not a pdf";
        let first = get_or_create(&config, bytes).await;

        // Plant a recognizable entry under the same hash; a second call must
        // return it verbatim instead of re-extracting.
        let planted = vec![Chunk {
            index: 0,
            text: "planted".to_string(),
        }];
        let path = cache_path(&config, &content_hash(bytes));
        std::fs::write(&path, serde_json::to_string(&planted).unwrap()).unwrap();

        let second = get_or_create(&config, bytes).await;
        assert_eq!(second, planted);
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_degrades_to_empty() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);

        let bytes = b"corrupt entry case";
        std::fs::create_dir_all(&config.cache.dir).unwrap();
        let path = cache_path(&config, &content_hash(bytes));
        std::fs::write(&path, "{{{ not json").unwrap();

        let chunks = get_or_create(&config, bytes).await;
        assert!(chunks.is_empty());
    }
}
