//! Chat-completion API client (Groq, OpenAI-compatible wire format).
//!
//! # Retry Strategy
//!
//! Transient errors back off exponentially:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use anyhow::{bail, Result};
use std::time::Duration;

use crate::config::CompletionConfig;
use crate::models::ChatMessage;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Client for the chat-completions endpoint.
#[derive(Debug)]
pub struct CompletionClient {
    api_key: String,
    config: CompletionConfig,
}

impl CompletionClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `GROQ_API_KEY` is not in the environment.
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let api_key = match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => key,
            _ => bail!("{API_KEY_ENV} environment variable not set"),
        };

        Ok(Self {
            api_key,
            config: config.clone(),
        })
    }

    /// Request a completion for the given message list and model.
    ///
    /// Sends `max_tokens` and `temperature` from config and returns the
    /// generated text. Retries rate limits, server errors, and network
    /// errors with exponential backoff; other client errors fail fast.
    pub async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()?;

        let body = serde_json::json!({
            "messages": messages,
            "model": model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        let mut last_err = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = client
                .post(&self.config.api_url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await?;
                        return parse_completion_response(&json);
                    }

                    // Rate limited or server error — retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(anyhow::anyhow!(
                            "completion API error {}: {}",
                            status,
                            body_text
                        ));
                        continue;
                    }

                    // Client error (not 429) — don't retry
                    let body_text = response.text().await.unwrap_or_default();
                    bail!("completion API error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Completion failed after retries")))
    }
}

/// Extract `choices[0].message.content` from a completion response.
fn parse_completion_response(json: &serde_json::Value) -> Result<String> {
    let content = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid completion response: missing message content"))?;

    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_fails_construction() {
        std::env::remove_var(API_KEY_ENV);
        let err = CompletionClient::new(&CompletionConfig::default()).unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_parse_valid_response() {
        let json = serde_json::json!({
            "choices": [
                {"message": {"role": "assistant", "content": "The answer is 42."}}
            ]
        });
        assert_eq!(
            parse_completion_response(&json).unwrap(),
            "The answer is 42."
        );
    }

    #[test]
    fn test_parse_missing_choices() {
        let json = serde_json::json!({"error": "bad request"});
        assert!(parse_completion_response(&json).is_err());
    }

    #[test]
    fn test_parse_empty_choices() {
        let json = serde_json::json!({"choices": []});
        assert!(parse_completion_response(&json).is_err());
    }

    #[test]
    fn test_parse_non_string_content() {
        let json = serde_json::json!({
            "choices": [{"message": {"content": null}}]
        });
        assert!(parse_completion_response(&json).is_err());
    }
}
