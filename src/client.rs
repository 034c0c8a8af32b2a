//! Chat endpoint dispatch
//!
//! One request per user turn: the full message history plus the new user
//! text goes out as a single POST, and the endpoint answers with the
//! assistant content (optionally annotated with web-search info). There is
//! no streaming, no retry, and no partial-result handling; any transport
//! failure or non-success status surfaces as a single error that the
//! session layer converts into a fallback assistant message.

use crate::error::{BubblyError, Result};
use crate::message::Message;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request body sent to the chat endpoint
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: &'a [Message],
    #[serde(rename = "userMessage")]
    user_message: &'a str,
}

/// Success response body from the chat endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// Assistant response content
    pub content: String,
    /// Optional web-search annotations
    #[serde(rename = "searchInfo")]
    pub search_info: Option<SearchInfo>,
}

/// Web-search annotations attached to a reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchInfo {
    /// Searches performed while answering
    pub searches: Vec<SearchQuery>,
}

/// A single search performed by the endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The query text
    pub query: String,
}

/// Seam for dispatching a user turn to the chat endpoint
///
/// Behind a trait so the session layer can be exercised against a mock
/// backend without a network.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send the conversation plus the new user text, returning the
    /// assistant reply
    async fn send(&self, messages: &[Message], user_message: &str) -> Result<ChatReply>;
}

/// HTTP client for the external chat endpoint
pub struct HttpChatClient {
    client: Client,
    endpoint: String,
}

impl HttpChatClient {
    /// Create a new client for the given endpoint URL
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Full URL of the chat endpoint
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bubbly/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BubblyError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = endpoint.into();
        tracing::info!("Initialized chat client: endpoint={}", endpoint);

        Ok(Self { client, endpoint })
    }

    /// The configured endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for HttpChatClient {
    async fn send(&self, messages: &[Message], user_message: &str) -> Result<ChatReply> {
        let body = ChatRequest {
            messages,
            user_message,
        };

        tracing::debug!(
            "Dispatching chat request: endpoint={}, history_len={}",
            self.endpoint,
            messages.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| BubblyError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(
                BubblyError::Transport(format!("Endpoint returned status {}", status)).into(),
            );
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| BubblyError::Transport(format!("Invalid response body: {}", e)))?;

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_uses_camel_case_user_message() {
        let messages = vec![Message::user("hi")];
        let body = ChatRequest {
            messages: &messages,
            user_message: "hi",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["userMessage"], "hi");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_reply_parses_without_search_info() {
        let reply: ChatReply = serde_json::from_str(r#"{"content":"hello"}"#).unwrap();
        assert_eq!(reply.content, "hello");
        assert!(reply.search_info.is_none());
    }

    #[test]
    fn test_reply_parses_search_info() {
        let raw = r#"{"content":"x","searchInfo":{"searches":[{"query":"rust"}]}}"#;
        let reply: ChatReply = serde_json::from_str(raw).unwrap();
        let info = reply.search_info.expect("search info missing");
        assert_eq!(info.searches.len(), 1);
        assert_eq!(info.searches[0].query, "rust");
    }

    #[test]
    fn test_client_construction_and_endpoint() {
        let client =
            HttpChatClient::new("http://localhost:9/api/chat", Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9/api/chat");
    }
}
