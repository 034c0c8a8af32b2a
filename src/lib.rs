//! Bubbly - chat client library
//!
//! This library provides the core functionality of a simple chat client:
//! markdown-flavored message formatting, capped conversation history, and
//! single-endpoint request dispatch.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `format`: the message formatting pipeline (markdown-flavored text to
//!   sanitized HTML fragments)
//! - `history`: persisted chat records, capped and most-recent-first
//! - `storage`: small key-value persistence interface with SQLite and
//!   in-memory backends
//! - `client`: dispatch of a user turn to the external chat endpoint
//! - `session`: active conversation state and its operations
//! - `theme`: persisted color theme selection
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`, `commands`, `repl`: the command-line surface
//!
//! # Example
//!
//! ```
//! use bubbly::format::format;
//!
//! let html = format("**hello** world");
//! assert_eq!(html, "<p><strong>hello</strong> world</p>");
//! ```

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod message;
pub mod repl;
pub mod session;
pub mod storage;
pub mod theme;

// Re-export commonly used types
pub use client::{ChatBackend, ChatReply, HttpChatClient};
pub use config::Config;
pub use error::{BubblyError, Result};
pub use history::{ChatRecord, ChatSummary, HistoryStore};
pub use message::Message;
pub use session::{SendOutcome, Session};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use theme::Theme;
