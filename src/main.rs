//! # PDF Chat CLI (`pdfchat`)
//!
//! The `pdfchat` binary answers natural-language questions about a PDF by
//! retrieving the most relevant chunks of its text and forwarding them as
//! context to an external chat-completion API.
//!
//! ## Usage
//!
//! ```bash
//! export GROQ_API_KEY=...
//! pdfchat [--config ./pdfchat.toml] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pdfchat chat <pdf>` | Interactive question/answer session over a PDF |
//! | `pdfchat ask <pdf> "<question>"` | Ask a single question and print the answer |
//! | `pdfchat index <pdf>` | Process and cache a PDF, printing pipeline stats |
//! | `pdfchat models` | List selectable model identifiers |

mod cache;
mod chat;
mod chunk;
mod completion;
mod config;
mod extract;
mod index;
mod models;
mod retrieve;
mod session;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// PDF Chat CLI — retrieval-augmented question answering over PDF documents.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; built-in defaults apply when the file is absent.
#[derive(Parser)]
#[command(
    name = "pdfchat",
    about = "PDF Chat — retrieval-augmented question answering over PDF documents",
    version,
    long_about = "PDF Chat extracts a PDF's text page by page, splits it into overlapping \
    word-window chunks, fits a TF-IDF index over them, and answers questions through an \
    external chat-completion API with the most similar chunks injected as context."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./pdfchat.toml`; built-in defaults are used when the
    /// file does not exist.
    #[arg(long, global = true, default_value = "./pdfchat.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session over a PDF.
    ///
    /// Loads the document (reusing the chunk cache when the same bytes were
    /// processed before), then reads questions from stdin until EOF or
    /// `exit`. Requires the `GROQ_API_KEY` environment variable.
    Chat {
        /// Path to the PDF file.
        pdf: PathBuf,

        /// Model identifier to use (see `pdfchat models`).
        #[arg(long)]
        model: Option<String>,
    },

    /// Ask a single question about a PDF and print the answer.
    Ask {
        /// Path to the PDF file.
        pdf: PathBuf,

        /// The question to ask.
        question: String,

        /// Model identifier to use (see `pdfchat models`).
        #[arg(long)]
        model: Option<String>,
    },

    /// Process and cache a PDF without chatting.
    ///
    /// Extracts, chunks, and caches the document, then prints the content
    /// hash, chunk count, and vocabulary size. Does not need an API key.
    Index {
        /// Path to the PDF file.
        pdf: PathBuf,
    },

    /// List the selectable model identifiers.
    Models,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Chat { pdf, model } => {
            chat::run_chat(&cfg, &pdf, model).await?;
        }
        Commands::Ask {
            pdf,
            question,
            model,
        } => {
            chat::run_ask(&cfg, &pdf, &question, model).await?;
        }
        Commands::Index { pdf } => {
            chat::run_index(&cfg, &pdf).await?;
        }
        Commands::Models => {
            chat::run_models(&cfg)?;
        }
    }

    Ok(())
}
