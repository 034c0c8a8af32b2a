//! Configuration management for Bubbly
//!
//! This module handles loading, parsing, and validating configuration from
//! a YAML file, with CLI overrides layered on top. Every field has a
//! default, so running without a config file works out of the box.

use crate::cli::Cli;
use crate::error::{BubblyError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Bubbly
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Chat endpoint settings
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// History persistence settings
    #[serde(default)]
    pub history: HistoryConfig,

    /// Chat surface settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Chat endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Full URL of the chat endpoint
    #[serde(default = "default_endpoint_url")]
    pub url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_endpoint_url() -> String {
    "http://localhost:8000/api/chat".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_endpoint_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// History persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of stored chats; inserting past the cap evicts the
    /// oldest
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Character budget for derived chat titles
    #[serde(default = "default_title_budget")]
    pub title_budget: usize,
}

fn default_capacity() -> usize {
    crate::history::DEFAULT_CAPACITY
}

fn default_title_budget() -> usize {
    crate::history::DEFAULT_TITLE_BUDGET
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            title_budget: default_title_budget(),
        }
    }
}

/// Chat surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Message shown in place of an assistant reply when a request fails
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,

    /// Suggested prompts offered at the start of an empty chat
    #[serde(default = "default_suggested_prompts")]
    pub suggested_prompts: Vec<String>,
}

fn default_fallback_message() -> String {
    "Sorry, I encountered an error. Please try again.".to_string()
}

fn default_suggested_prompts() -> Vec<String> {
    vec![
        "Explain a concept in simple terms".to_string(),
        "Help me write some code".to_string(),
        "Summarize a topic for me".to_string(),
    ]
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            fallback_message: default_fallback_message(),
            suggested_prompts: default_suggested_prompts(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, applying CLI overrides
    ///
    /// A missing file yields the default configuration; a present but
    /// malformed file is an error.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed CLI arguments whose overrides take precedence
    pub fn load(path: impl AsRef<Path>, cli: &Cli) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| BubblyError::Config(format!("Failed to read {:?}: {}", path, e)))?;
            serde_yaml::from_str(&contents)
                .map_err(|e| BubblyError::Config(format!("Failed to parse {:?}: {}", path, e)))?
        } else {
            tracing::debug!("Config file {:?} not found, using defaults", path);
            Config::default()
        };

        if let Some(url) = &cli.endpoint {
            config.endpoint.url = url.clone();
        }

        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `BubblyError::Config` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.url.is_empty() {
            return Err(BubblyError::Config("endpoint.url must not be empty".into()).into());
        }
        if !self.endpoint.url.starts_with("http://") && !self.endpoint.url.starts_with("https://") {
            return Err(BubblyError::Config(format!(
                "endpoint.url must be an http(s) URL, got {}",
                self.endpoint.url
            ))
            .into());
        }
        if self.endpoint.timeout_seconds == 0 {
            return Err(BubblyError::Config("endpoint.timeout_seconds must be > 0".into()).into());
        }
        if self.history.capacity == 0 {
            return Err(BubblyError::Config("history.capacity must be > 0".into()).into());
        }
        if self.history.title_budget == 0 {
            return Err(BubblyError::Config("history.title_budget must be > 0".into()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use tempfile::tempdir;

    fn empty_cli() -> Cli {
        Cli::parse_from_args(["bubbly", "history", "list"])
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.history.capacity, 20);
        assert_eq!(config.history.title_budget, 30);
        assert_eq!(config.endpoint.timeout_seconds, 120);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load("/nonexistent/bubbly.yaml", &empty_cli()).unwrap();
        assert_eq!(config.endpoint.url, "http://localhost:8000/api/chat");
    }

    #[test]
    fn test_partial_yaml_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "endpoint:\n  url: https://chat.example.com/api\n").unwrap();

        let config = Config::load(&path, &empty_cli()).unwrap();
        assert_eq!(config.endpoint.url, "https://chat.example.com/api");
        assert_eq!(config.history.capacity, 20);
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "endpoint: [not: valid").unwrap();

        assert!(Config::load(&path, &empty_cli()).is_err());
    }

    #[test]
    fn test_cli_endpoint_override_wins() {
        let cli = Cli::parse_from_args([
            "bubbly",
            "--endpoint",
            "https://override.example.com",
            "history",
            "list",
        ]);
        let config = Config::load("/nonexistent.yaml", &cli).unwrap();
        assert_eq!(config.endpoint.url, "https://override.example.com");
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let mut config = Config::default();
        config.endpoint.url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = Config::default();
        config.endpoint.url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = Config::default();
        config.history.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_title_budget() {
        let mut config = Config::default();
        config.history.title_budget = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.endpoint.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }
}
