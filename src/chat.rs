//! CLI command handlers.
//!
//! Each `run_*` function backs one subcommand of the `pdfchat` binary.
//! User-facing output goes to stdout; diagnostics go through `tracing`.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;

use crate::cache;
use crate::config::Config;
use crate::index::TfIdfIndex;
use crate::session::Session;

/// Interactive chat over a PDF. Reads questions from stdin until EOF or
/// `exit`/`quit`.
pub async fn run_chat(config: &Config, pdf: &Path, model: Option<String>) -> Result<()> {
    let mut session = open_session(config, pdf, model).await?;

    println!("Ask a question about your PDF (exit to quit).");
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query == "exit" || query == "quit" {
            break;
        }

        let reply = session.ask(query).await;
        println!("{reply}");
        println!();
    }

    Ok(())
}

/// One-shot question: load the PDF, ask, print the answer.
pub async fn run_ask(
    config: &Config,
    pdf: &Path,
    question: &str,
    model: Option<String>,
) -> Result<()> {
    let mut session = open_session(config, pdf, model).await?;
    let reply = session.ask(question).await;
    println!("{reply}");
    Ok(())
}

/// Process and cache a PDF without starting a chat; print pipeline stats.
pub async fn run_index(config: &Config, pdf: &Path) -> Result<()> {
    let bytes = std::fs::read(pdf)
        .with_context(|| format!("Failed to read PDF file: {}", pdf.display()))?;

    let hash = cache::content_hash(&bytes);
    let chunks = cache::get_or_create(config, &bytes).await;

    println!("document: {}", pdf.display());
    println!("  content hash: {hash}");
    println!("  chunks: {}", chunks.len());

    match TfIdfIndex::fit(&chunks) {
        Ok(index) => println!("  vocabulary terms: {}", index.vocabulary_size()),
        Err(e) => println!("  index: unavailable ({e})"),
    }

    Ok(())
}

/// List the configured model identifiers, marking the default.
pub fn run_models(config: &Config) -> Result<()> {
    for model in &config.completion.models {
        if model == &config.completion.model {
            println!("{model} (default)");
        } else {
            println!("{model}");
        }
    }
    Ok(())
}

async fn open_session(config: &Config, pdf: &Path, model: Option<String>) -> Result<Session> {
    if let Some(ref model) = model {
        if !config.completion.models.contains(model) {
            bail!(
                "Unknown model: '{}'. Run `pdfchat models` to list available models.",
                model
            );
        }
    }

    let mut session = Session::new(config)?;
    if let Some(model) = model {
        session.set_model(model);
    }

    let bytes = std::fs::read(pdf)
        .with_context(|| format!("Failed to read PDF file: {}", pdf.display()))?;
    let stats = session.load_document(&bytes).await;

    if stats.index_ready {
        println!("PDF processed successfully: {} chunks.", stats.chunk_count);
    } else {
        println!("Failed to process the PDF; answering without document context.");
    }

    Ok(session)
}
