// src/error.rs

//! Unified error handling for the crawler application.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built or used
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Search page could not be rendered
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Document inspection could not run to completion
    #[error("Document error: {0}")]
    Document(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a document error.
    pub fn document(message: impl fmt::Display) -> Self {
        Self::Document(message.to_string())
    }
}

/// Failures reported by a browser session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrowserError {
    /// No response within the allotted window
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Any other network failure
    #[error("transport failure: {0}")]
    Transport(String),
}

impl BrowserError {
    /// Create a transport error.
    pub fn transport(message: impl fmt::Display) -> Self {
        Self::Transport(message.to_string())
    }
}

/// Failures while downloading a candidate document.
///
/// These are always recovered by moving on to the next candidate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Non-2xx response
    #[error("HTTP status {status}")]
    Http { status: u16 },

    /// No response within the download window
    #[error("download timed out")]
    Timeout,

    /// Network or local write failure
    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<BrowserError> for FetchError {
    fn from(err: BrowserError) -> Self {
        match err {
            BrowserError::Timeout(_) => Self::Timeout,
            BrowserError::Transport(message) => Self::Transport(message),
        }
    }
}

/// Failures while opening a document through an inspector.
#[derive(Error, Debug)]
pub enum InspectError {
    /// The file is not a readable document
    #[error("not a document: {0}")]
    Unreadable(String),

    /// Page index out of range
    #[error("page {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },
}
