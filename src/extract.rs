//! Per-page PDF text extraction.
//!
//! Pages are extracted independently and in parallel, bounded by a worker
//! pool of `extraction.max_workers` permits. A page that fails to extract
//! logs a warning and contributes an empty string; it never aborts the
//! document. A PDF that fails to parse at all yields an empty string.

use std::sync::Arc;

use lopdf::Document;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

/// Extract the concatenated text of every page, in page order, separated
/// by newlines. Infallible at this boundary: total failure returns `""`.
pub async fn extract_text(bytes: &[u8], max_workers: usize) -> String {
    let doc = match Document::load_mem(bytes) {
        Ok(doc) => Arc::new(doc),
        Err(e) => {
            error!("failed to parse PDF: {e}");
            return String::new();
        }
    };

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    debug!("extracting {} pages", page_numbers.len());

    let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
    let mut tasks = JoinSet::new();

    for page in page_numbers {
        let doc = Arc::clone(&doc);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return (page, String::new()),
            };
            let text = match tokio::task::spawn_blocking(move || doc.extract_text(&[page])).await {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    warn!(page, "skipped page: {e}");
                    String::new()
                }
                Err(e) => {
                    warn!(page, "page extraction task failed: {e}");
                    String::new()
                }
            };
            (page, text)
        });
    }

    // Fan-in by completion order; re-establish page order afterwards.
    let mut pages: Vec<(u32, String)> = Vec::new();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(pair) => pages.push(pair),
            Err(e) => warn!("page extraction task panicked: {e}"),
        }
    }
    pages.sort_by_key(|(page, _)| *page);

    pages
        .iter()
        .map(|(_, text)| text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
