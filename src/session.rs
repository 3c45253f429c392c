//! Chat session orchestration.
//!
//! A [`Session`] owns all per-session state explicitly: the append-only
//! conversation history, the active model, and the loaded document's
//! chunks and fitted index. It is constructed by the CLI handler and
//! dropped at exit — no ambient globals.
//!
//! [`Session::ask`] never fails: a completion error is logged and replaced
//! by a fixed apology turn, keeping the session alive.

use anyhow::Result;
use tracing::{error, warn};

use crate::cache;
use crate::completion::CompletionClient;
use crate::config::Config;
use crate::index::TfIdfIndex;
use crate::models::{ChatMessage, Chunk};
use crate::retrieve;

/// Fixed system instruction sent with every completion request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant for answering questions about the \
    given PDF content. Use the provided context to answer questions, but also consider the \
    conversation history.";

/// Assistant reply substituted when the completion call fails.
pub const APOLOGY: &str = "I'm sorry, but I encountered an error while processing your request. \
    Please try again.";

/// Outcome of loading a document into the session.
#[derive(Debug, Clone, Copy)]
pub struct DocumentStats {
    pub chunk_count: usize,
    pub index_ready: bool,
}

/// All state for one chat session over one document.
pub struct Session {
    config: Config,
    client: CompletionClient,
    model: String,
    messages: Vec<ChatMessage>,
    chunks: Vec<Chunk>,
    index: Option<TfIdfIndex>,
}

impl Session {
    /// Create an empty session. Fails if the API key is missing.
    pub fn new(config: &Config) -> Result<Self> {
        let client = CompletionClient::new(&config.completion)?;
        Ok(Self {
            config: config.clone(),
            client,
            model: config.completion.model.clone(),
            messages: Vec::new(),
            chunks: Vec::new(),
            index: None,
        })
    }

    /// Process a document's bytes into chunks (via the cache) and fit the
    /// retrieval index. A fit failure leaves the index unset and the
    /// session answering without context.
    pub async fn load_document(&mut self, bytes: &[u8]) -> DocumentStats {
        self.chunks = cache::get_or_create(&self.config, bytes).await;
        self.index = match TfIdfIndex::fit(&self.chunks) {
            Ok(index) => Some(index),
            Err(e) => {
                warn!("could not fit retrieval index: {e:#}");
                None
            }
        };
        DocumentStats {
            chunk_count: self.chunks.len(),
            index_ready: self.index.is_some(),
        }
    }

    /// Switch the active model for subsequent turns.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The append-only conversation history.
    pub fn history(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Answer a user query with retrieved document context.
    ///
    /// Appends the user turn, retrieves the top-k most similar chunks
    /// (empty context when no index is loaded), calls the completion API,
    /// and appends the reply — or the fixed apology on failure — as the
    /// assistant turn. Never returns an error.
    pub async fn ask(&mut self, query: &str) -> String {
        self.messages.push(ChatMessage::user(query));

        let context = match &self.index {
            Some(index) => {
                let relevant =
                    retrieve::top_k(query, &self.chunks, index, self.config.retrieval.top_k);
                relevant
                    .iter()
                    .map(|chunk| chunk.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n\n")
            }
            None => String::new(),
        };

        let request = build_request(&self.messages, &context);

        let reply = match self.client.complete(&request, &self.model).await {
            Ok(text) => text,
            Err(e) => {
                error!("completion request failed: {e:#}");
                APOLOGY.to_string()
            }
        };

        self.messages.push(ChatMessage::assistant(reply.clone()));
        reply
    }
}

/// Assemble the outbound message list: the system instruction, all prior
/// turns except the newest, then the newest user message prefixed with the
/// retrieved context.
fn build_request(history: &[ChatMessage], context: &str) -> Vec<ChatMessage> {
    let (latest, prior) = match history.split_last() {
        Some(split) => split,
        None => return vec![ChatMessage::system(SYSTEM_PROMPT)],
    };

    let mut request = Vec::with_capacity(prior.len() + 2);
    request.push(ChatMessage::system(SYSTEM_PROMPT));
    request.extend(prior.iter().cloned());
    request.push(ChatMessage::user(format!(
        "Context: {context}\n\nBased on this context and our previous conversation, \
         please answer the following question: {}",
        latest.content
    )));
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_build_request_wraps_latest_turn() {
        let history = vec![
            ChatMessage::user("first question"),
            ChatMessage::assistant("first answer"),
            ChatMessage::user("second question"),
        ];
        let request = build_request(&history, "some context");

        assert_eq!(request.len(), 4);
        assert_eq!(request[0].role, Role::System);
        assert_eq!(request[0].content, SYSTEM_PROMPT);
        assert_eq!(request[1].content, "first question");
        assert_eq!(request[2].content, "first answer");
        assert_eq!(request[3].role, Role::User);
        assert!(request[3].content.starts_with("Context: some context"));
        assert!(request[3].content.ends_with("second question"));
    }

    #[test]
    fn test_build_request_single_turn() {
        let history = vec![ChatMessage::user("only question")];
        let request = build_request(&history, "");

        assert_eq!(request.len(), 2);
        assert_eq!(request[0].role, Role::System);
        assert!(request[1].content.starts_with("Context: \n\n"));
        assert!(request[1].content.ends_with("only question"));
    }

    #[test]
    fn test_build_request_never_duplicates_latest_turn() {
        let history = vec![
            ChatMessage::user("q1"),
            ChatMessage::assistant("a1"),
            ChatMessage::user("q2"),
        ];
        let request = build_request(&history, "background");
        let raw_q2 = request.iter().filter(|m| m.content == "q2").count();
        assert_eq!(raw_q2, 0, "latest turn must only appear in wrapped form");
    }
}
