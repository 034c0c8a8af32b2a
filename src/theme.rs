//! Color theme selection
//!
//! The selected theme is persisted under its own storage key so it survives
//! across sessions. Unknown or missing stored values fall back to light.

use crate::error::Result;
use crate::storage::{KeyValueStore, KEY_THEME};
use std::fmt;

/// Color theme for the chat surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Light theme (default)
    #[default]
    Light,
    /// Dark theme
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl Theme {
    /// Parse a theme from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use bubbly::theme::Theme;
    ///
    /// assert_eq!(Theme::parse_str("dark").unwrap(), Theme::Dark);
    /// assert!(Theme::parse_str("sepia").is_err());
    /// ```
    pub fn parse_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }

    /// The opposite theme
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Load the persisted theme, defaulting to light when unset or
    /// unrecognized
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let stored = store.get(KEY_THEME)?;
        Ok(stored
            .as_deref()
            .and_then(|name| Self::parse_str(name).ok())
            .unwrap_or_default())
    }

    /// Persist this theme
    pub fn store(self, store: &dyn KeyValueStore) -> Result<()> {
        store.set(KEY_THEME, &self.to_string())
    }
}
