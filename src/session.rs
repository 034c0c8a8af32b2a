//! Active chat session state
//!
//! Holds the mutable state of the running chat: the active conversation,
//! the current chat id, and the loading flag that prevents overlapping
//! sends. All work is event-driven on one logical flow of control; the one
//! asynchronous operation is the network request, which suspends the
//! calling flow without blocking anything else.
//!
//! Persistence semantics follow the history manager: the active
//! conversation auto-saves after every exchange, switching chats implicitly
//! saves a non-empty draft first, and loaded conversations are copied (not
//! aliased) so later mutation never corrupts the stored record.

use crate::client::{ChatBackend, SearchInfo};
use crate::error::Result;
use crate::history::{ChatSummary, HistoryStore};
use crate::message::Message;

/// Outcome of submitting user input
#[derive(Debug)]
pub enum SendOutcome {
    /// The endpoint answered; content was appended to the conversation
    Replied {
        /// Assistant response content
        content: String,
        /// Optional web-search annotations
        search_info: Option<SearchInfo>,
    },
    /// The request failed; the fixed fallback message was appended instead
    Fallback(String),
    /// Empty or whitespace-only input was ignored
    Ignored,
    /// A request is already in flight
    Busy,
}

/// An active chat session over a history store and a chat backend
pub struct Session {
    history: HistoryStore,
    backend: Box<dyn ChatBackend>,
    messages: Vec<Message>,
    current_id: String,
    loading: bool,
    fallback_message: String,
}

impl Session {
    /// Create a fresh session with an empty conversation
    pub fn new(
        history: HistoryStore,
        backend: Box<dyn ChatBackend>,
        fallback_message: impl Into<String>,
    ) -> Self {
        Self {
            history,
            backend,
            messages: Vec::new(),
            current_id: HistoryStore::new_chat_id(),
            loading: false,
            fallback_message: fallback_message.into(),
        }
    }

    /// The active conversation
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The current chat id
    pub fn current_id(&self) -> &str {
        &self.current_id
    }

    /// Whether a request is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Access the underlying history manager
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Start a new empty conversation, saving the current one first when it
    /// has messages
    ///
    /// Returns the fresh chat id.
    pub fn start_new(&mut self) -> Result<String> {
        if !self.messages.is_empty() {
            self.history.save(&self.current_id, &self.messages)?;
        }
        self.messages.clear();
        self.current_id = HistoryStore::new_chat_id();
        tracing::debug!("Started new chat: id={}", self.current_id);
        Ok(self.current_id.clone())
    }

    /// Load a stored conversation into the active session
    ///
    /// A non-empty active conversation under a different id is implicitly
    /// saved first. The stored messages are copied into the session.
    /// Returns false when no record exists for `id`.
    pub fn load(&mut self, id: &str) -> Result<bool> {
        let Some(record) = self.history.get(id)? else {
            return Ok(false);
        };

        if !self.messages.is_empty() && self.current_id != id {
            self.history.save(&self.current_id, &self.messages)?;
        }

        self.current_id = record.id;
        self.messages = record.messages;
        tracing::debug!(
            "Loaded chat: id={}, messages={}",
            self.current_id,
            self.messages.len()
        );
        Ok(true)
    }

    /// Delete a stored conversation
    ///
    /// Deleting the active conversation discards the draft and starts a new
    /// empty one (without re-saving what was just deleted).
    pub fn delete(&mut self, id: &str) -> Result<()> {
        self.history.delete(id)?;
        if self.current_id == id {
            self.messages.clear();
            self.current_id = HistoryStore::new_chat_id();
        }
        Ok(())
    }

    /// List stored chats, most-recent-first
    pub fn list(&self) -> Result<Vec<ChatSummary>> {
        self.history.list()
    }

    /// Submit user input to the chat endpoint
    ///
    /// Empty or whitespace-only input is ignored, as is input while a
    /// request is in flight. Otherwise the user message is appended, the
    /// full history is dispatched, and the assistant reply (or, on any
    /// failure, the fixed fallback message) is appended. The user message
    /// is never rolled back. The conversation auto-saves after the
    /// exchange.
    pub async fn send(&mut self, input: &str) -> Result<SendOutcome> {
        let text = input.trim();
        if text.is_empty() {
            return Ok(SendOutcome::Ignored);
        }
        if self.loading {
            return Ok(SendOutcome::Busy);
        }

        self.messages.push(Message::user(text));
        self.loading = true;

        let result = self.backend.send(&self.messages, text).await;
        self.loading = false;

        let outcome = match result {
            Ok(reply) => {
                self.messages.push(Message::assistant(reply.content.clone()));
                SendOutcome::Replied {
                    content: reply.content,
                    search_info: reply.search_info,
                }
            }
            Err(error) => {
                tracing::error!("Chat request failed: {:#}", error);
                self.messages
                    .push(Message::assistant(self.fallback_message.clone()));
                SendOutcome::Fallback(self.fallback_message.clone())
            }
        };

        self.history.save(&self.current_id, &self.messages)?;
        Ok(outcome)
    }

    /// Drop the last exchange and resend the same user text
    ///
    /// Requires at least one completed exchange; otherwise the call is
    /// ignored.
    pub async fn regenerate(&mut self) -> Result<SendOutcome> {
        if self.messages.len() < 2 {
            return Ok(SendOutcome::Ignored);
        }

        // Last assistant reply, then the user message that prompted it
        self.messages.pop();
        let Some(last_user) = self.messages.pop() else {
            return Ok(SendOutcome::Ignored);
        };

        self.send(&last_user.content).await
    }
}
