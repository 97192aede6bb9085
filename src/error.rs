//! Error types for promptdrop
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for promptdrop operations
///
/// This enum encompasses all possible errors that can occur while staging
/// files, talking to the relay endpoint, loading configuration, or invoking
/// the hosted model provider.
#[derive(Error, Debug)]
pub enum PromptdropError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (model API calls, authentication, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Upload staging and submission errors
    #[error("Upload error: {0}")]
    Upload(String),

    /// Relay endpoint rejected or failed a transmitted request
    #[error("Relay error: {0}")]
    Relay(String),

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

/// Result type alias for promptdrop operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
