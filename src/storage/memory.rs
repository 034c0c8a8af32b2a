//! In-memory key-value store for tests and ephemeral sessions

use super::KeyValueStore;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Mutex;

/// Key-value store holding everything in a process-local map
///
/// Nothing survives the process; useful for tests and for running the chat
/// loop without touching the user's data directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| anyhow::anyhow!("poisoned store lock: {}", e))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| anyhow::anyhow!("poisoned store lock: {}", e))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| anyhow::anyhow!("poisoned store lock: {}", e))?;
        entries.remove(key);
        Ok(())
    }
}
