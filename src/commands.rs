//! Command handlers
//!
//! Each CLI subcommand maps to one handler here. The interactive chat loop
//! lives in [`crate::repl`]; this module covers the one-shot operations:
//! history management, transcript export, and stdin formatting.

use crate::client::HttpChatClient;
use crate::config::Config;
use crate::error::{BubblyError, Result};
use crate::format;
use crate::history::{ChatRecord, HistoryStore};
use crate::session::Session;
use crate::storage::SqliteStore;
use chrono::{TimeZone, Utc};
use colored::Colorize;
use prettytable::{row, Table};
use std::io::Read;
use std::time::Duration;

/// Build the history manager over the production SQLite backend
pub fn build_history(config: &Config) -> Result<HistoryStore> {
    let store = SqliteStore::new()?;
    Ok(HistoryStore::new(
        Box::new(store),
        config.history.capacity,
        config.history.title_budget,
    ))
}

/// Start an interactive chat session, optionally resuming a stored chat
pub async fn chat(config: &Config, resume: Option<String>) -> Result<()> {
    let history = build_history(config)?;
    let backend = HttpChatClient::new(
        config.endpoint.url.clone(),
        Duration::from_secs(config.endpoint.timeout_seconds),
    )?;
    let mut session = Session::new(history, Box::new(backend), &config.chat.fallback_message);

    if let Some(id) = resume {
        if !session.load(&id)? {
            return Err(BubblyError::Storage(format!("No stored chat with id {}", id)).into());
        }
        println!("Resumed chat {} ({} messages)", id, session.messages().len());
    }

    // Theme persistence shares the same database as the history
    let theme_store = SqliteStore::new()?;
    crate::repl::run(&mut session, Box::new(theme_store), config).await
}

/// List stored chats as a table, most recent first
pub fn history_list(history: &HistoryStore) -> Result<()> {
    let summaries = history.list()?;

    if summaries.is_empty() {
        println!("No chat history yet");
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(row!["ID", "TITLE", "SAVED", "MESSAGES"]);
    for summary in summaries {
        table.add_row(row![
            summary.id,
            summary.title,
            format_timestamp(summary.timestamp),
            summary.message_count
        ]);
    }
    table.printstd();

    Ok(())
}

/// Print the messages of a stored chat
pub fn history_show(history: &HistoryStore, id: &str) -> Result<()> {
    let record = history
        .get(id)?
        .ok_or_else(|| BubblyError::Storage(format!("No stored chat with id {}", id)))?;

    println!("{} ({})", record.title.bold(), format_timestamp(record.timestamp));
    println!();
    for message in &record.messages {
        let label = if message.is_user() {
            "you".green()
        } else {
            "assistant".cyan()
        };
        println!("{} {}", format!("{} >>", label).bold(), message.content);
        println!();
    }

    Ok(())
}

/// Delete a stored chat
pub fn history_delete(history: &HistoryStore, id: &str) -> Result<()> {
    history.delete(id)?;
    println!("Deleted chat {}", id);
    Ok(())
}

/// Render a stored conversation to an HTML transcript file
pub fn export(history: &HistoryStore, id: &str, output: Option<String>) -> Result<()> {
    let record = history
        .get(id)?
        .ok_or_else(|| BubblyError::Export(format!("No stored chat with id {}", id)))?;

    let path = output.unwrap_or_else(|| format!("{}.html", record.id));
    let html = render_transcript(&record);
    std::fs::write(&path, html)?;

    println!("Exported chat {} to {}", id, path);
    Ok(())
}

/// Format markdown-flavored text from a file (or stdin) and print the HTML
/// fragment
pub fn format_input(file: Option<String>) -> Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    println!("{}", format::format(&raw));
    Ok(())
}

/// Render a chat record as a standalone HTML transcript
///
/// Every message body goes through the formatting pipeline, so assistant
/// markdown renders and user text is escaped.
pub fn render_transcript(record: &ChatRecord) -> String {
    let mut body = String::new();
    for message in &record.messages {
        let (class, sender) = if message.is_user() {
            ("message user", "You")
        } else {
            ("message assistant", "Assistant")
        };
        body.push_str(&format!(
            "<div class=\"{}\"><div class=\"message-sender\">{}</div>\
             <div class=\"message-bubble\">{}</div></div>\n",
            class,
            sender,
            format::format(&message.content)
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n\
         <h1>{title}</h1>\n<p class=\"exported-at\">{saved}</p>\n\
         {body}</body>\n</html>\n",
        title = format::escape_html(&record.title),
        saved = format_timestamp(record.timestamp),
        body = body
    )
}

/// Render a millisecond unix timestamp for display
fn format_timestamp(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}
