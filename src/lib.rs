//! # PDF Chat
//!
//! A retrieval-augmented chat CLI for asking questions about PDF documents.
//!
//! PDF Chat extracts a document's text page by page, splits it into
//! overlapping word-window chunks, fits a TF-IDF index over the chunk set,
//! and answers free-text questions through an external chat-completion API
//! with the top-k most similar chunks injected as context.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────┐   ┌─────────┐   ┌────────┐   ┌─────────┐
//! │ Extract │──▶│  Chunk  │──▶│ Cache  │──▶│ TF-IDF  │
//! │ (pages) │   │ (words) │   │ (disk) │   │  Index  │
//! └─────────┘   └─────────┘   └────────┘   └────┬────┘
//!                                               │ per query
//!                                          ┌────▼─────┐   ┌────────────┐
//!                                          │ Retrieve │──▶│ Completion │
//!                                          │  top-k   │   │    API     │
//!                                          └──────────┘   └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export GROQ_API_KEY=...
//! pdfchat index paper.pdf            # process + cache a document
//! pdfchat ask paper.pdf "What is the main result?"
//! pdfchat chat paper.pdf             # interactive session
//! pdfchat models                     # list selectable models
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`extract`] | Per-page PDF text extraction |
//! | [`chunk`] | Overlapping word-window chunking |
//! | [`cache`] | Content-addressed chunk cache |
//! | [`index`] | TF-IDF vectorizer and index |
//! | [`retrieve`] | Top-k cosine-similarity retrieval |
//! | [`completion`] | Chat-completion API client |
//! | [`session`] | Conversation orchestration |
//! | [`chat`] | CLI command handlers |

pub mod cache;
pub mod chat;
pub mod chunk;
pub mod completion;
pub mod config;
pub mod extract;
pub mod index;
pub mod models;
pub mod retrieve;
pub mod session;
