//! Error types for Bubbly
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Bubbly operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, chat dispatch, history persistence, and
/// transcript export.
#[derive(Error, Debug)]
pub enum BubblyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chat endpoint errors (network failures, non-success responses)
    #[error("Transport error: {0}")]
    Transport(String),

    /// History storage errors (key-value backend operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Transcript export errors
    #[error("Export error: {0}")]
    Export(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Bubbly operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
