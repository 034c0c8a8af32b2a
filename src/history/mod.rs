//! Chat history persistence
//!
//! Past conversations are stored as a single serialized collection of
//! [`ChatRecord`]s under one storage key, ordered most-recent-first and
//! capped at a fixed maximum count. Saving always removes any existing
//! record with the same id and re-inserts at the front, so the collection
//! never holds duplicate ids and stays sorted by "most recently saved".

use crate::error::Result;
use crate::message::Message;
use crate::storage::{KeyValueStore, KEY_CHATS};
use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-local sequence disambiguating ids minted in the same millisecond
static CHAT_ID_SEQ: AtomicU64 = AtomicU64::new(0);

/// Default maximum number of stored chats
pub const DEFAULT_CAPACITY: usize = 20;

/// Default character budget for derived chat titles
pub const DEFAULT_TITLE_BUDGET: usize = 30;

/// A persisted, named snapshot of a past conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    /// Unique, time-derived identifier
    pub id: String,
    /// Title derived from the first user message
    pub title: String,
    /// The conversation messages at save time
    pub messages: Vec<Message>,
    /// Unix timestamp (milliseconds) of the last save
    pub timestamp: i64,
}

/// Summary of a stored chat for list rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSummary {
    /// Unique identifier for the chat
    pub id: String,
    /// Derived title
    pub title: String,
    /// Unix timestamp (milliseconds) of the last save
    pub timestamp: i64,
    /// Number of messages in the stored conversation
    pub message_count: usize,
}

/// Manager for the persisted chat-record collection
pub struct HistoryStore {
    store: Box<dyn KeyValueStore>,
    capacity: usize,
    title_budget: usize,
}

impl HistoryStore {
    /// Create a history manager over the given key-value backend
    ///
    /// # Arguments
    ///
    /// * `store` - Key-value backend holding the serialized collection
    /// * `capacity` - Maximum number of records kept; inserting past the cap
    ///   evicts the oldest
    /// * `title_budget` - Character budget for derived titles
    pub fn new(store: Box<dyn KeyValueStore>, capacity: usize, title_budget: usize) -> Self {
        Self {
            store,
            capacity,
            title_budget,
        }
    }

    /// Generate a fresh time-derived chat identifier
    ///
    /// The millisecond timestamp carries the ordering; the sequence suffix
    /// keeps ids unique when several chats start within one millisecond.
    pub fn new_chat_id() -> String {
        let seq = CHAT_ID_SEQ.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", Utc::now().timestamp_millis(), seq)
    }

    /// Save or update the conversation under `id`
    ///
    /// A no-op for an empty conversation. Any existing record with the same
    /// id is removed before the new record is inserted at the front; the
    /// collection is then truncated to capacity and persisted.
    pub fn save(&self, id: &str, messages: &[Message]) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }

        let mut records = self.load_all()?;
        records.retain(|record| record.id != id);
        records.insert(
            0,
            ChatRecord {
                id: id.to_string(),
                title: self.derive_title(messages),
                messages: messages.to_vec(),
                timestamp: Utc::now().timestamp_millis(),
            },
        );
        records.truncate(self.capacity);

        self.persist(&records)
    }

    /// Fetch the stored record for `id`, if any
    pub fn get(&self, id: &str) -> Result<Option<ChatRecord>> {
        let records = self.load_all()?;
        Ok(records.into_iter().find(|record| record.id == id))
    }

    /// Remove the record with `id`; removing a missing id is not an error
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.load_all()?;
        records.retain(|record| record.id != id);
        self.persist(&records)
    }

    /// List summaries of all stored chats, most-recent-first
    pub fn list(&self) -> Result<Vec<ChatSummary>> {
        let records = self.load_all()?;
        Ok(records
            .into_iter()
            .map(|record| ChatSummary {
                id: record.id,
                title: record.title,
                timestamp: record.timestamp,
                message_count: record.messages.len(),
            })
            .collect())
    }

    /// Derive a chat title from the first user message
    ///
    /// Truncated to the configured character budget, with an ellipsis marker
    /// when truncation actually happened.
    fn derive_title(&self, messages: &[Message]) -> String {
        let source = messages
            .iter()
            .find(|message| message.is_user())
            .or_else(|| messages.first())
            .map(|message| message.content.as_str())
            .unwrap_or_default();

        let mut title: String = source.chars().take(self.title_budget).collect();
        if source.chars().count() > self.title_budget {
            title.push_str("...");
        }
        title
    }

    fn load_all(&self) -> Result<Vec<ChatRecord>> {
        match self.store.get(KEY_CHATS)? {
            Some(serialized) => {
                serde_json::from_str(&serialized).context("Failed to parse stored chat history")
            }
            None => Ok(Vec::new()),
        }
    }

    fn persist(&self, records: &[ChatRecord]) -> Result<()> {
        let serialized =
            serde_json::to_string(records).context("Failed to serialize chat history")?;
        self.store.set(KEY_CHATS, &serialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn test_history() -> HistoryStore {
        HistoryStore::new(Box::new(MemoryStore::new()), 3, 10)
    }

    fn conversation(text: &str) -> Vec<Message> {
        vec![Message::user(text), Message::assistant("reply")]
    }

    #[test]
    fn test_save_empty_conversation_is_noop() {
        let history = test_history();
        history.save("id-1", &[]).expect("save failed");
        assert!(history.list().expect("list failed").is_empty());
    }

    #[test]
    fn test_save_then_get_roundtrip() {
        let history = test_history();
        let messages = conversation("hello");
        history.save("id-1", &messages).expect("save failed");

        let record = history
            .get("id-1")
            .expect("get failed")
            .expect("record missing");
        assert_eq!(record.id, "id-1");
        assert_eq!(record.messages, messages);
    }

    #[test]
    fn test_list_is_most_recently_saved_first() {
        let history = test_history();
        history.save("first", &conversation("a")).expect("save a");
        history.save("second", &conversation("b")).expect("save b");

        let summaries = history.list().expect("list failed");
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, "second");
        assert_eq!(summaries[1].id, "first");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let history = test_history();
        for i in 0..4 {
            history
                .save(&format!("id-{}", i), &conversation("x"))
                .expect("save failed");
        }

        let summaries = history.list().expect("list failed");
        assert_eq!(summaries.len(), 3);
        // id-0 was the oldest and got evicted
        assert!(summaries.iter().all(|s| s.id != "id-0"));
        assert_eq!(summaries[0].id, "id-3");
    }

    #[test]
    fn test_resave_replaces_in_place_without_duplicates() {
        let history = test_history();
        history.save("id-1", &conversation("old")).expect("save 1");
        history.save("id-2", &conversation("other")).expect("save 2");

        let updated = vec![
            Message::user("old"),
            Message::assistant("reply"),
            Message::user("more"),
        ];
        history.save("id-1", &updated).expect("resave failed");

        let summaries = history.list().expect("list failed");
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries.iter().filter(|s| s.id == "id-1").count(), 1);
        // Re-saved record moved back to the front
        assert_eq!(summaries[0].id, "id-1");
        assert_eq!(summaries[0].message_count, 3);

        let record = history.get("id-1").expect("get failed").expect("missing");
        assert_eq!(record.messages, updated);
    }

    #[test]
    fn test_delete_removes_record() {
        let history = test_history();
        history.save("id-1", &conversation("a")).expect("save");
        history.delete("id-1").expect("delete failed");
        assert!(history.get("id-1").expect("get failed").is_none());
    }

    #[test]
    fn test_delete_missing_id_is_idempotent() {
        let history = test_history();
        history.delete("never-saved").expect("delete failed");
    }

    #[test]
    fn test_title_within_budget_has_no_ellipsis() {
        let history = test_history();
        history.save("id-1", &conversation("short")).expect("save");
        let record = history.get("id-1").expect("get").expect("missing");
        assert_eq!(record.title, "short");
    }

    #[test]
    fn test_title_over_budget_truncated_with_ellipsis() {
        let history = test_history();
        history
            .save("id-1", &conversation("0123456789abcdef"))
            .expect("save");
        let record = history.get("id-1").expect("get").expect("missing");
        assert_eq!(record.title, "0123456789...");
    }

    #[test]
    fn test_title_exactly_at_budget_has_no_ellipsis() {
        let history = test_history();
        history
            .save("id-1", &conversation("0123456789"))
            .expect("save");
        let record = history.get("id-1").expect("get").expect("missing");
        assert_eq!(record.title, "0123456789");
    }

    #[test]
    fn test_title_counts_characters_not_bytes() {
        let history = test_history();
        history
            .save("id-1", &conversation("héllo wörld plus more"))
            .expect("save");
        let record = history.get("id-1").expect("get").expect("missing");
        assert_eq!(record.title, "héllo wörl...");
    }

    #[test]
    fn test_title_comes_from_first_user_message() {
        let history = test_history();
        let messages = vec![
            Message::assistant("greeting first"),
            Message::user("the actual question"),
        ];
        history.save("id-1", &messages).expect("save");
        let record = history.get("id-1").expect("get").expect("missing");
        assert!(record.title.starts_with("the actual"));
    }

    #[test]
    fn test_new_chat_ids_are_unique_even_when_minted_quickly() {
        let a = HistoryStore::new_chat_id();
        let b = HistoryStore::new_chat_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_records_persist_through_shared_backend() {
        let store = Box::new(MemoryStore::new());
        let history = HistoryStore::new(store, 3, 10);
        history.save("id-1", &conversation("a")).expect("save");

        // A second manager over the same backend would see the same data;
        // here we at least verify the round trip through serialization.
        let record = history.get("id-1").expect("get").expect("missing");
        assert_eq!(record.messages.len(), 2);
    }
}
