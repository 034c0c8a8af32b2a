//! Conversation message types
//!
//! A conversation is an ordered, append-only sequence of messages exchanged
//! between the user and the assistant. Messages are immutable once created
//! and are replaced wholesale when a stored chat is loaded.

use serde::{Deserialize, Serialize};

/// Message structure for conversation
///
/// Represents a single message in the conversation. Messages come from
/// either the user or the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user or assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Arguments
    ///
    /// * `content` - The message content
    ///
    /// # Examples
    ///
    /// ```
    /// use bubbly::message::Message;
    ///
    /// let msg = Message::user("Hello, assistant!");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    ///
    /// # Arguments
    ///
    /// * `content` - The message content
    ///
    /// # Examples
    ///
    /// ```
    /// use bubbly::message::Message;
    ///
    /// let msg = Message::assistant("Hello, user!");
    /// assert_eq!(msg.role, "assistant");
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Returns true if this message was sent by the user
    pub fn is_user(&self) -> bool {
        self.role == "user"
    }

    /// Returns true if this message was sent by the assistant
    pub fn is_assistant(&self) -> bool {
        self.role == "assistant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_construction() {
        let msg = Message::user("hi");
        assert_eq!(msg.role, "user");
        assert_eq!(msg.content, "hi");
        assert!(msg.is_user());
        assert!(!msg.is_assistant());
    }

    #[test]
    fn test_assistant_message_construction() {
        let msg = Message::assistant("hello");
        assert_eq!(msg.role, "assistant");
        assert_eq!(msg.content, "hello");
        assert!(msg.is_assistant());
        assert!(!msg.is_user());
    }

    #[test]
    fn test_message_serialization_shape() {
        let msg = Message::user("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_message_roundtrip() {
        let messages = vec![Message::user("a"), Message::assistant("b")];
        let json = serde_json::to_string(&messages).expect("serialize failed");
        let deserialized: Vec<Message> = serde_json::from_str(&json).expect("deserialize failed");
        assert_eq!(deserialized, messages);
    }
}
